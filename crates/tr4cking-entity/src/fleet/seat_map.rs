//! Row-by-row rendering of a bus's seats for seat pickers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tr4cking_core::AppError;
use tr4cking_core::types::SeatId;

use super::seat::{Seat, SeatState};

/// Seats on each side of the aisle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeatArrangement {
    /// Two seats, aisle, two seats.
    #[default]
    #[serde(rename = "2-2")]
    TwoTwo,
    /// Two seats, aisle, one seat.
    #[serde(rename = "2-1")]
    TwoOne,
}

impl SeatArrangement {
    /// Seats per row, aisle excluded.
    pub fn seats_per_row(&self) -> usize {
        match self {
            Self::TwoTwo => 4,
            Self::TwoOne => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoTwo => "2-2",
            Self::TwoOne => "2-1",
        }
    }
}

impl fmt::Display for SeatArrangement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SeatArrangement {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2-2" => Ok(Self::TwoTwo),
            "2-1" => Ok(Self::TwoOne),
            _ => Err(AppError::validation(format!(
                "Invalid seat arrangement: '{s}'. Expected '2-2' or '2-1'"
            ))),
        }
    }
}

/// One seat position in the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatCell {
    pub seat_id: SeatId,
    pub number: i32,
    pub state: SeatState,
}

/// Seats laid out in rows; `None` marks the aisle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatMap {
    pub arrangement: SeatArrangement,
    pub rows: Vec<Vec<Option<SeatCell>>>,
}

impl SeatMap {
    /// Lay out `seats` in ascending number order, aisle after the second seat.
    pub fn build(arrangement: SeatArrangement, seats: &[Seat]) -> Self {
        let mut ordered: Vec<&Seat> = seats.iter().collect();
        ordered.sort_by_key(|s| s.number);

        let rows = ordered
            .chunks(arrangement.seats_per_row())
            .map(|chunk| {
                let mut row: Vec<Option<SeatCell>> = Vec::with_capacity(chunk.len() + 1);
                for (i, seat) in chunk.iter().enumerate() {
                    if i == 2 {
                        row.push(None);
                    }
                    row.push(Some(SeatCell {
                        seat_id: seat.id,
                        number: seat.number,
                        state: seat.state,
                    }));
                }
                row
            })
            .collect();

        Self { arrangement, rows }
    }

    /// Count of cells in `state`.
    pub fn count(&self, state: SeatState) -> usize {
        self.rows
            .iter()
            .flatten()
            .flatten()
            .filter(|cell| cell.state == state)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tr4cking_core::types::BusId;

    fn seats(n: i32) -> Vec<Seat> {
        (1..=n)
            .rev()
            .map(|number| Seat {
                id: SeatId::new(i64::from(number) + 100),
                bus_id: BusId::new(1),
                number,
                state: if number == 3 {
                    SeatState::Occupied
                } else {
                    SeatState::Available
                },
                kind: None,
            })
            .collect()
    }

    #[test]
    fn test_two_two_layout() {
        let map = SeatMap::build(SeatArrangement::TwoTwo, &seats(10));
        assert_eq!(map.rows.len(), 3);
        let first: Vec<Option<i32>> = map.rows[0]
            .iter()
            .map(|c| c.as_ref().map(|c| c.number))
            .collect();
        assert_eq!(first, vec![Some(1), Some(2), None, Some(3), Some(4)]);
        // last row holds seats 9 and 10, no aisle needed
        assert_eq!(map.rows[2].len(), 2);
        assert_eq!(map.count(SeatState::Occupied), 1);
    }

    #[test]
    fn test_two_one_layout() {
        let map = SeatMap::build(SeatArrangement::TwoOne, &seats(6));
        assert_eq!(map.rows.len(), 2);
        assert_eq!(map.rows[1].len(), 4);
        assert!(map.rows[1][2].is_none());
        assert_eq!(map.rows[1][3].as_ref().map(|c| c.number), Some(6));
    }

    #[test]
    fn test_arrangement_parse() {
        assert_eq!("2-1".parse::<SeatArrangement>().unwrap(), SeatArrangement::TwoOne);
        assert!("3-3".parse::<SeatArrangement>().is_err());
        assert_eq!(SeatArrangement::default(), SeatArrangement::TwoTwo);
    }
}
