use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a single grid cell expressed as column (`x`) and row (`y`).
///
/// Coordinates are signed so that a step off the edge of a world produces a
/// representable position that bounds checks can reject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the position.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the position.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the position shifted by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Returns the neighbouring position one step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Every orthogonal direction, clockwise from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit column and row deltas for the direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }
}

/// Dimensions of a world grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldSize {
    width: u32,
    height: u32,
}

impl WorldSize {
    /// Creates a new size descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let cells = u64::from(self.width) * u64::from(self.height);
        usize::try_from(cells).unwrap_or(usize::MAX)
    }

    /// Cell at `(floor(width / 2), floor(height / 2))`.
    #[must_use]
    pub fn center(&self) -> Position {
        Position::new(half(self.width), half(self.height))
    }

    /// Reports whether the position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Reports whether the position lies on the outermost ring of cells.
    #[must_use]
    pub fn is_border(&self, position: Position) -> bool {
        if !self.contains(position) {
            return false;
        }
        let last_column = i64::from(self.width) - 1;
        let last_row = i64::from(self.height) - 1;
        let x = i64::from(position.x());
        let y = i64::from(position.y());
        x == 0 || y == 0 || x == last_column || y == last_row
    }

    /// Row-major index of the position, if it lies inside the grid.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column >= self.width || row >= self.height {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        Some(row * width + column)
    }
}

fn half(value: u32) -> i32 {
    i32::try_from(value / 2).unwrap_or(i32::MAX)
}

/// Closed set of tile kinds a world can contain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open ground.
    Empty,
    /// Impassable obstacle or boundary.
    Wall,
    /// Ancient ruins, usually with an artifact nearby.
    Ruins,
    /// Costs extra supplies every time it is entered.
    Hazard,
    /// Hostile presence that costs a large amount of supplies when entered.
    Enemy,
    /// Collectible artifact.
    Artifact,
    /// The world's gate; travel is dialed from here.
    Gate,
    /// Collectible gate fragment.
    GateFragment,
    /// Collectible supply cache.
    Supplies,
    /// Rare collectible that unlocks the terminal destination.
    PowerCell,
    /// Marker used by presentation layers to draw the player.
    PlayerMarker,
}

impl TileKind {
    /// Reports whether the player may enter a tile of this kind.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall)
    }

    /// Reports whether tiles of this kind carry an identifier and are consumed on pickup.
    #[must_use]
    pub const fn is_collectible(self) -> bool {
        matches!(
            self,
            Self::Artifact | Self::GateFragment | Self::Supplies | Self::PowerCell
        )
    }

    /// Lowercase label used in identifiers and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Ruins => "ruins",
            Self::Hazard => "hazard",
            Self::Enemy => "enemy",
            Self::Artifact => "artifact",
            Self::Gate => "gate",
            Self::GateFragment => "fragment",
            Self::Supplies => "supplies",
            Self::PowerCell => "power-cell",
            Self::PlayerMarker => "player",
        }
    }
}

/// Identifier attached to a collectible tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CollectibleId(String);

impl CollectibleId {
    /// Creates a new collectible identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed string form of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single cell of a world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Kind of content occupying the cell.
    pub kind: TileKind,
    /// Grid coordinate of the cell; always equal to its slot in the grid.
    pub position: Position,
    /// Identifier of the collectible, present only on collectible kinds.
    pub id: Option<CollectibleId>,
    /// Whether the cell has entered the player's revealed set. Never reverts.
    pub discovered: bool,
    /// Facing assigned to enemies at generation time.
    pub facing: Option<Direction>,
}

impl Tile {
    /// Creates an empty tile at the provided position.
    #[must_use]
    pub const fn empty(position: Position, discovered: bool) -> Self {
        Self {
            kind: TileKind::Empty,
            position,
            id: None,
            discovered,
            facing: None,
        }
    }

    /// Turns the tile into open ground, yielding the identifier it carried.
    pub fn consume(&mut self) -> Option<CollectibleId> {
        self.kind = TileKind::Empty;
        self.facing = None;
        self.id.take()
    }
}

/// Fixed-size, row-major grid of tiles.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTileGrid")]
pub struct TileGrid {
    size: WorldSize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Allocates a grid of empty tiles.
    #[must_use]
    pub fn filled(size: WorldSize, discovered: bool) -> Self {
        let mut tiles = Vec::with_capacity(size.cell_count());
        for row in 0..size.height() {
            for column in 0..size.width() {
                let position = Position::new(
                    i32::try_from(column).unwrap_or(i32::MAX),
                    i32::try_from(row).unwrap_or(i32::MAX),
                );
                tiles.push(Tile::empty(position, discovered));
            }
        }
        Self { size, tiles }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> WorldSize {
        self.size
    }

    /// Tile at the provided position, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.size
            .index(position)
            .and_then(|index| self.tiles.get(index))
    }

    /// Mutable tile at the provided position, if it lies inside the grid.
    pub fn tile_mut(&mut self, position: Position) -> Option<&mut Tile> {
        self.size
            .index(position)
            .and_then(|index| self.tiles.get_mut(index))
    }

    /// Kind of the tile at the provided position.
    #[must_use]
    pub fn kind_at(&self, position: Position) -> Option<TileKind> {
        self.tile(position).map(|tile| tile.kind)
    }

    /// Reports whether the position is inside the grid and holds open ground.
    #[must_use]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.kind_at(position) == Some(TileKind::Empty)
    }

    /// Iterator over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterator over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        let width = usize::try_from(self.size.width()).unwrap_or(1).max(1);
        self.tiles.chunks(width)
    }

    /// Number of tiles of the provided kind.
    #[must_use]
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|tile| tile.kind == kind).count()
    }

    /// Marks every tile within `radius` Manhattan steps of `center` as discovered.
    pub fn reveal_around(&mut self, center: Position, radius: u32) {
        for tile in &mut self.tiles {
            if tile.position.manhattan_distance(center) <= radius {
                tile.discovered = true;
            }
        }
    }
}

/// Reasons a serialized grid fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridShapeError {
    /// Tile count does not match the declared dimensions.
    #[error("grid declares {expected} cells but holds {actual}")]
    CellCount {
        /// Cells implied by the declared size.
        expected: usize,
        /// Tiles present in the payload.
        actual: usize,
    },
    /// A tile's stored position disagrees with its slot.
    #[error("tile in slot {index} claims position {position}")]
    Misplaced {
        /// Row-major slot of the tile.
        index: usize,
        /// Position stored on the tile.
        position: Position,
    },
}

#[derive(Deserialize)]
struct RawTileGrid {
    size: WorldSize,
    tiles: Vec<Tile>,
}

impl TryFrom<RawTileGrid> for TileGrid {
    type Error = GridShapeError;

    fn try_from(raw: RawTileGrid) -> Result<Self, Self::Error> {
        let expected = raw.size.cell_count();
        if raw.tiles.len() != expected {
            return Err(GridShapeError::CellCount {
                expected,
                actual: raw.tiles.len(),
            });
        }
        for (index, tile) in raw.tiles.iter().enumerate() {
            if raw.size.index(tile.position) != Some(index) {
                return Err(GridShapeError::Misplaced {
                    index,
                    position: tile.position,
                });
            }
        }
        Ok(Self {
            size: raw.size,
            tiles: raw.tiles,
        })
    }
}
