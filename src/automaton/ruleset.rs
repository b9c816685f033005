//! Birth/survival rule tables.

use std::fmt;
use std::str::FromStr;

use super::neighbourhood::NeighbourhoodType;
use crate::error::{AutomatonError, Result};

/// The rules of an automaton: its neighbourhood type, and for every possible
/// live-neighbour count whether a dead cell is born and a live cell survives.
///
/// Both tables hold `num_cells + 1` entries and are reset to all-false
/// whenever the neighbourhood type changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ruleset {
    neighbourhood_type: NeighbourhoodType,
    born: Vec<bool>,
    survive: Vec<bool>,
}

impl Ruleset {
    /// A ruleset where nothing is ever born and nothing survives.
    pub fn new(neighbourhood_type: NeighbourhoodType) -> Self {
        let len = neighbourhood_type.num_cells() as usize + 1;
        Ruleset {
            neighbourhood_type,
            born: vec![false; len],
            survive: vec![false; len],
        }
    }

    /// Conway's Game of Life: Moore radius 1, B3/S23.
    pub fn conway() -> Self {
        let mut ruleset = Ruleset::new(NeighbourhoodType::MOORE);
        ruleset.born[3] = true;
        ruleset.survive[2] = true;
        ruleset.survive[3] = true;
        ruleset
    }

    /// Parse a rulestring such as `B3/S23` against the given neighbourhood.
    ///
    /// Counts are single digits unless a section contains a comma, in which
    /// case it is a comma-separated list (`B3,10/S2,3`).
    pub fn from_rulestring(neighbourhood_type: NeighbourhoodType, rule: &str) -> Result<Self> {
        let mut ruleset = Ruleset::new(neighbourhood_type);
        let (born, survive) = rule
            .trim()
            .split_once('/')
            .ok_or(AutomatonError::InvalidArgument("rulestring must look like B.../S..."))?;
        let born = strip_prefix_ignore_case(born, 'b')
            .ok_or(AutomatonError::InvalidArgument("rulestring birth section must start with B"))?;
        let survive = strip_prefix_ignore_case(survive, 's')
            .ok_or(AutomatonError::InvalidArgument("rulestring survival section must start with S"))?;

        for count in parse_counts(born)? {
            ruleset.set_born_with(count, true)?;
        }
        for count in parse_counts(survive)? {
            ruleset.set_survives_with(count, true)?;
        }
        Ok(ruleset)
    }

    pub fn neighbourhood_type(&self) -> &NeighbourhoodType {
        &self.neighbourhood_type
    }

    /// Replace the neighbourhood type. Existing rules do not carry over.
    pub fn set_neighbourhood_type(&mut self, neighbourhood_type: NeighbourhoodType) {
        *self = Ruleset::new(neighbourhood_type);
    }

    /// Should a dead cell with this many live neighbours become alive?
    #[inline]
    pub fn is_born_with(&self, num_neighbours: u32) -> Result<bool> {
        self.check_in_range(num_neighbours)?;
        Ok(self.born[num_neighbours as usize])
    }

    /// Should a live cell with this many live neighbours survive?
    #[inline]
    pub fn survives_with(&self, num_neighbours: u32) -> Result<bool> {
        self.check_in_range(num_neighbours)?;
        Ok(self.survive[num_neighbours as usize])
    }

    pub fn set_born_with(&mut self, num_neighbours: u32, value: bool) -> Result<()> {
        self.check_in_range(num_neighbours)?;
        self.born[num_neighbours as usize] = value;
        Ok(())
    }

    pub fn set_survives_with(&mut self, num_neighbours: u32, value: bool) -> Result<()> {
        self.check_in_range(num_neighbours)?;
        self.survive[num_neighbours as usize] = value;
        Ok(())
    }

    /// Next state of a cell given its current state and live-neighbour count.
    #[inline]
    pub fn next_state(&self, alive: bool, num_neighbours: u32) -> Result<bool> {
        if alive {
            self.survives_with(num_neighbours)
        } else {
            self.is_born_with(num_neighbours)
        }
    }

    #[inline]
    fn check_in_range(&self, num_neighbours: u32) -> Result<()> {
        if num_neighbours > self.neighbourhood_type.num_cells() {
            return Err(AutomatonError::InvalidArgument(
                "neighbour count exceeds the number of cells in the neighbourhood",
            ));
        }
        Ok(())
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset::conway()
    }
}

impl FromStr for Ruleset {
    type Err = AutomatonError;

    /// Parses against the radius-1 Moore neighbourhood.
    fn from_str(rule: &str) -> Result<Self> {
        Ruleset::from_rulestring(NeighbourhoodType::MOORE, rule)
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wide = self.neighbourhood_type.num_cells() > 9;
        write_section(f, 'B', &self.born, wide)?;
        f.write_str("/")?;
        write_section(f, 'S', &self.survive, wide)
    }
}

fn write_section(f: &mut fmt::Formatter<'_>, prefix: char, table: &[bool], wide: bool) -> fmt::Result {
    write!(f, "{}", prefix)?;
    let counts: Vec<String> = table
        .iter()
        .enumerate()
        .filter(|&(_, &on)| on)
        .map(|(count, _)| count.to_string())
        .collect();
    f.write_str(&counts.join(if wide { "," } else { "" }))
}

fn strip_prefix_ignore_case(section: &str, prefix: char) -> Option<&str> {
    let section = section.trim();
    let mut chars = section.chars();
    match chars.next() {
        Some(c) if c.eq_ignore_ascii_case(&prefix) => Some(chars.as_str()),
        _ => None,
    }
}

fn parse_counts(section: &str) -> Result<Vec<u32>> {
    let section = section.trim();
    if section.is_empty() {
        return Ok(Vec::new());
    }
    if section.contains(',') {
        section
            .split(',')
            .map(|count| {
                count
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| AutomatonError::InvalidArgument("rulestring count is not a number"))
            })
            .collect()
    } else {
        section
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .ok_or(AutomatonError::InvalidArgument("rulestring count is not a digit"))
            })
            .collect()
    }
}
