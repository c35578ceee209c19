//! Symbolic block names and block references.
//!
//! Every present block gets exactly one name. Decorators, labels and
//! callouts address blocks either by grid position or by that name; both
//! forms are resolved to a position once, through a [`NameMap`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::types::{Grid, NameOverride, NamingMode};

/// A block addressed by grid position or by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockRef {
    Position(usize, usize),
    Name(String),
}

impl From<(usize, usize)> for BlockRef {
    fn from((r, c): (usize, usize)) -> Self {
        BlockRef::Position(r, c)
    }
}

impl From<&str> for BlockRef {
    fn from(name: &str) -> Self {
        BlockRef::Name(name.to_string())
    }
}

impl From<String> for BlockRef {
    fn from(name: String) -> Self {
        BlockRef::Name(name)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Position(r, c) => write!(f, "({r}, {c})"),
            BlockRef::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// Conventional name of the block at `(block_row, block_col)`.
///
/// Two-column grids are elimination stacks (`E{row}` eliminators on the
/// left, `A{row}` matrices on the right); other grids use `M{col}{row}`.
/// Legacy mode uses `A{row}x{col}` regardless of shape.
pub fn convention_name(
    mode: NamingMode,
    n_block_cols: usize,
    block_row: usize,
    block_col: usize,
) -> String {
    match mode {
        NamingMode::Legacy => format!("A{block_row}x{block_col}"),
        NamingMode::Default if n_block_cols == 2 => {
            let prefix = if block_col == 0 { 'E' } else { 'A' };
            format!("{prefix}{block_row}")
        }
        NamingMode::Default => format!("M{block_col}{block_row}"),
    }
}

/// Bidirectional name table for the present blocks of one grid
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameMap {
    by_name: BTreeMap<String, (usize, usize)>,
    by_position: BTreeMap<(usize, usize), String>,
}

impl NameMap {
    /// Name every present block of `grid`.
    ///
    /// # Errors
    /// Returns [`LayoutError::NameCollision`] when two blocks end up with the
    /// same name, whether from overrides or from the convention itself.
    pub fn build(grid: &Grid, mode: NamingMode, overrides: &[NameOverride]) -> Result<Self> {
        let mut map = NameMap::default();
        for (r, c, _) in grid.iter_blocks() {
            let name = overrides
                .iter()
                .rev()
                .find(|o| o.grid == (r, c))
                .map_or_else(
                    || convention_name(mode, grid.n_block_cols(), r, c),
                    |o| o.name.clone(),
                );
            if let Some(&first) = map.by_name.get(&name) {
                return Err(LayoutError::NameCollision {
                    name,
                    first,
                    second: (r, c),
                });
            }
            map.by_position.insert((r, c), name.clone());
            map.by_name.insert(name, (r, c));
        }

        for o in overrides {
            if !map.by_position.contains_key(&o.grid) {
                log::warn!(
                    "ignoring name override {:?} for empty grid position {:?}",
                    o.name,
                    o.grid
                );
            }
        }
        Ok(map)
    }

    pub fn name_of(&self, block_row: usize, block_col: usize) -> Option<&str> {
        self.by_position
            .get(&(block_row, block_col))
            .map(String::as_str)
    }

    pub fn position_of(&self, name: &str) -> Option<(usize, usize)> {
        self.by_name.get(name).copied()
    }

    /// All names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_name.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolve a reference to the position of a present block.
    ///
    /// # Errors
    /// Returns [`LayoutError::NameResolution`] for unknown names and for
    /// positions holding no block.
    pub fn resolve(&self, block: &BlockRef) -> Result<(usize, usize)> {
        let found = match block {
            BlockRef::Position(r, c) => self.by_position.contains_key(&(*r, *c)).then_some((*r, *c)),
            BlockRef::Name(name) => self.position_of(name),
        };
        found.ok_or_else(|| LayoutError::NameResolution {
            reference: block.to_string(),
            available: self.names().map(str::to_string).collect(),
        })
    }
}

/// Position of the block named `name` under the default naming convention.
pub fn resolve_name(name: &str, grid: &Grid) -> Option<(usize, usize)> {
    NameMap::build(grid, NamingMode::Default, &[])
        .ok()?
        .position_of(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::Block;

    fn ge_stack() -> Grid {
        Grid::new(vec![
            vec![None, Some(Block::from([[1, 2], [3, 4]]))],
            vec![
                Some(Block::from([[1, 0], [0, 1]])),
                Some(Block::from([[5, 6], [7, 8]])),
            ],
        ])
    }

    #[test]
    fn test_two_column_convention() {
        let names = NameMap::build(&ge_stack(), NamingMode::Default, &[]).unwrap();
        let all: Vec<&str> = names.names().collect();
        assert_eq!(all, vec!["A0", "A1", "E1"]);
        assert_eq!(names.position_of("E1"), Some((1, 0)));
        assert_eq!(names.name_of(0, 1), Some("A0"));
        assert_eq!(names.name_of(0, 0), None);
    }

    #[test]
    fn test_single_column_convention() {
        let grid = Grid::new(vec![vec![Some(Block::from([[1]]))], vec![Some(Block::from([[2]]))]]);
        let names = NameMap::build(&grid, NamingMode::Default, &[]).unwrap();
        assert_eq!(names.name_of(0, 0), Some("M00"));
        assert_eq!(names.name_of(1, 0), Some("M01"));
    }

    #[test]
    fn test_legacy_convention() {
        let names = NameMap::build(&ge_stack(), NamingMode::Legacy, &[]).unwrap();
        assert_eq!(names.name_of(1, 0), Some("A1x0"));
        assert_eq!(names.name_of(1, 1), Some("A1x1"));
    }

    #[test]
    fn test_override_and_collision() {
        let rename = [NameOverride {
            grid: (1, 1),
            name: "Final".to_string(),
        }];
        let names = NameMap::build(&ge_stack(), NamingMode::Default, &rename).unwrap();
        assert_eq!(names.position_of("Final"), Some((1, 1)));
        assert_eq!(names.position_of("A1"), None);

        let clash = [NameOverride {
            grid: (1, 1),
            name: "A0".to_string(),
        }];
        match NameMap::build(&ge_stack(), NamingMode::Default, &clash) {
            Err(LayoutError::NameCollision { name, first, second }) => {
                assert_eq!(name, "A0");
                assert_eq!(first, (0, 1));
                assert_eq!(second, (1, 1));
            }
            other => panic!("expected NameCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_convention_collision_is_reported() {
        // M{col}{row} is ambiguous once indices reach two digits: M1 11 vs M11 1.
        let mut rows = vec![vec![None; 12]; 12];
        rows[11][1] = Some(Block::from([[1]]));
        rows[1][11] = Some(Block::from([[1]]));
        let grid = Grid::new(rows);
        assert!(matches!(
            NameMap::build(&grid, NamingMode::Default, &[]),
            Err(LayoutError::NameCollision { .. })
        ));
    }

    #[test]
    fn test_resolve_refs() {
        let names = NameMap::build(&ge_stack(), NamingMode::Default, &[]).unwrap();
        assert_eq!(names.resolve(&BlockRef::from("A1")).unwrap(), (1, 1));
        assert_eq!(names.resolve(&BlockRef::from((1, 0))).unwrap(), (1, 0));
        assert!(matches!(
            names.resolve(&BlockRef::from((0, 0))),
            Err(LayoutError::NameResolution { .. })
        ));
        assert!(matches!(
            names.resolve(&BlockRef::from("nope")),
            Err(LayoutError::NameResolution { .. })
        ));
        assert_eq!(resolve_name("E1", &ge_stack()), Some((1, 0)));
        assert_eq!(resolve_name("E0", &ge_stack()), None);
    }
}
