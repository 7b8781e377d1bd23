//! Game variants, setup strings and initial stone layouts.
//!
//! A setup string has the form `<variantName> [<randomSeed>] [<revisionNumber>]`.
//! The variant picks the board size, the initial layout rule and the win
//! condition; randomized layouts are fully determined by the seed.

use std::fmt;
use std::str::FromStr;

use board_game_traits::Color;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::position::Square;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Mirrored rows of stones along two opposite edges; last group
    /// standing wins.
    Standard,
    /// The standard edge cells, with the colors shuffled by the seed.
    Scrambled,
    /// Stones dropped on seeded random interior squares.
    Parachute,
    /// The full stone census scattered over seeded random squares.
    Random,
    /// Standard layout, but every move scars its origin square.
    Scorched,
    /// 7x7 point race with vacate moves.
    PointRace,
    /// A caller-supplied stone list as `(file, rank, color)` triples.
    Custom(Vec<(u8, u8, Color)>),
}

impl Variant {
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Standard => "LOA",
            Variant::Scrambled => "Scrambled",
            Variant::Parachute => "Parachute",
            Variant::Random => "Random",
            Variant::Scorched => "Scorched",
            Variant::PointRace => "LOAP",
            Variant::Custom(_) => "Custom",
        }
    }
}

/// How a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WinCondition {
    /// First color whose stones form exactly one group wins.
    LastGroupStanding,
    /// Points from captures and connections race to `target`; at
    /// `move_limit` plies the higher total wins.
    PointRace { target: i32, move_limit: usize },
}

/// The rule switches a variant selects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantRules {
    pub scars: bool,
    pub vacate: bool,
    pub win: WinCondition,
}

/// A parsed setup string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setup {
    pub variant: Variant,
    pub seed: Option<u64>,
    pub revision: Option<u32>,
}

impl Default for Setup {
    fn default() -> Self {
        Setup {
            variant: Variant::Standard,
            seed: None,
            revision: None,
        }
    }
}

impl Setup {
    pub fn new(variant: Variant) -> Self {
        Setup {
            variant,
            seed: None,
            revision: None,
        }
    }

    pub fn with_seed(variant: Variant, seed: u64) -> Self {
        Setup {
            variant,
            seed: Some(seed),
            revision: None,
        }
    }

    /// A fully custom stone list, given as `(file, rank, color)` triples.
    pub fn custom(stones: Vec<(u8, u8, Color)>) -> Self {
        Setup::new(Variant::Custom(stones))
    }

    /// The board size this variant is played on.
    pub fn size(&self) -> usize {
        match self.variant {
            Variant::PointRace => 7,
            _ => 8,
        }
    }

    pub fn rules(&self) -> VariantRules {
        match self.variant {
            Variant::Scorched => VariantRules {
                scars: true,
                vacate: false,
                win: WinCondition::LastGroupStanding,
            },
            Variant::PointRace => VariantRules {
                scars: false,
                vacate: true,
                win: WinCondition::PointRace {
                    target: 15,
                    move_limit: 200,
                },
            },
            _ => VariantRules {
                scars: false,
                vacate: false,
                win: WinCondition::LastGroupStanding,
            },
        }
    }

    fn rng(&self, attempt: u32) -> SmallRng {
        // Retries perturb the seed deterministically, so a given
        // (seed, attempt) pair reproduces the same layout everywhere
        let seed = self
            .seed
            .unwrap_or_default()
            .wrapping_add(attempt as u64 * 0x9e37_79b9_7f4a_7c15);
        SmallRng::seed_from_u64(seed)
    }

    /// The stones this setup starts with. `attempt` is only used to reroll
    /// randomized layouts that begin in a decided position.
    pub(crate) fn initial_stones<const S: usize>(
        &self,
        attempt: u32,
    ) -> Result<Vec<(Square<S>, Color)>, pgn_traits::Error> {
        match &self.variant {
            Variant::Standard | Variant::Scorched | Variant::PointRace => Ok(edge_layout::<S>()),
            Variant::Scrambled => {
                let mut stones = edge_layout::<S>();
                let mut colors: Vec<Color> =
                    stones.iter().map(|(_, color)| *color).collect();
                colors.shuffle(&mut self.rng(attempt));
                for (stone, color) in stones.iter_mut().zip(colors) {
                    stone.1 = color;
                }
                Ok(stones)
            }
            Variant::Parachute => {
                let mut interior: Vec<Square<S>> = crate::position::squares_iterator::<S>()
                    .filter(|square| {
                        square.file() != 0
                            && square.file() != S as u8 - 1
                            && square.rank() != 0
                            && square.rank() != S as u8 - 1
                    })
                    .collect();
                interior.shuffle(&mut self.rng(attempt));
                Ok(assign_census(&interior))
            }
            Variant::Random => {
                let mut squares: Vec<Square<S>> =
                    crate::position::squares_iterator::<S>().collect();
                squares.shuffle(&mut self.rng(attempt));
                Ok(assign_census(&squares))
            }
            Variant::Custom(stones) => stones
                .iter()
                .map(|&(file, rank, color)| {
                    if file as usize >= S || rank as usize >= S {
                        Err(pgn_traits::Error::new_parse_error(format!(
                            "Custom stone ({}, {}) is outside the {}x{} board",
                            file, rank, S, S
                        )))
                    } else {
                        Ok((Square::from_file_rank(file, rank), color))
                    }
                })
                .collect(),
        }
    }
}

/// Black along the bottom and top edges, White along the left and right
/// edges, corners left free.
fn edge_layout<const S: usize>() -> Vec<(Square<S>, Color)> {
    let mut stones = vec![];
    for i in 1..S as u8 - 1 {
        stones.push((Square::from_file_rank(i, 0), Color::Black));
        stones.push((Square::from_file_rank(i, S as u8 - 1), Color::Black));
        stones.push((Square::from_file_rank(0, i), Color::White));
        stones.push((Square::from_file_rank(S as u8 - 1, i), Color::White));
    }
    stones
}

/// Put the standard stone census onto the front of a shuffled square list.
fn assign_census<const S: usize>(squares: &[Square<S>]) -> Vec<(Square<S>, Color)> {
    let per_color = 2 * (S - 2);
    squares
        .iter()
        .take(2 * per_color)
        .enumerate()
        .map(|(i, &square)| {
            let color = if i < per_color {
                Color::Black
            } else {
                Color::White
            };
            (square, color)
        })
        .collect()
}

impl FromStr for Setup {
    type Err = pgn_traits::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let name = words.next().ok_or_else(|| {
            pgn_traits::Error::new_parse_error("Empty setup string".to_string())
        })?;
        let variant = match name.to_ascii_lowercase().as_str() {
            "loa" | "standard" => Variant::Standard,
            "scrambled" => Variant::Scrambled,
            "parachute" => Variant::Parachute,
            "random" => Variant::Random,
            "scorched" => Variant::Scorched,
            "loap" => Variant::PointRace,
            _ => {
                return Err(pgn_traits::Error::new_parse_error(format!(
                    "Unsupported variant \"{}\"",
                    name
                )));
            }
        };
        let seed = match words.next() {
            Some(word) => Some(word.parse::<u64>().map_err(|err| {
                pgn_traits::Error::new_parse_error(format!(
                    "Bad random seed \"{}\": {}",
                    word, err
                ))
            })?),
            None => None,
        };
        let revision = match words.next() {
            Some(word) => Some(word.parse::<u32>().map_err(|err| {
                pgn_traits::Error::new_parse_error(format!(
                    "Bad revision number \"{}\": {}",
                    word, err
                ))
            })?),
            None => None,
        };
        if let Some(extra) = words.next() {
            return Err(pgn_traits::Error::new_parse_error(format!(
                "Unexpected \"{}\" in setup string \"{}\"",
                extra, input
            )));
        }
        Ok(Setup {
            variant,
            seed,
            revision,
        })
    }
}

impl fmt::Display for Setup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.variant.name())?;
        if let Some(seed) = self.seed {
            write!(f, " {}", seed)?;
        }
        if let Some(revision) = self.revision {
            write!(f, " {}", revision)?;
        }
        Ok(())
    }
}
