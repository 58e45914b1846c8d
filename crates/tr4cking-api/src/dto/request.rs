//! Query-string DTOs.

use serde::Deserialize;

use tr4cking_entity::fleet::SeatArrangement;
use tr4cking_entity::user::UserRole;

/// `GET /api/buses/{id}/seat-map?arrangement=2-1`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeatMapQuery {
    #[serde(default)]
    pub arrangement: SeatArrangement,
}

/// `GET /api/users?role=clerk`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_map_query_defaults_to_four_abreast() {
        let query: SeatMapQuery = serde_json::from_str("{}").expect("empty query");
        assert_eq!(query.arrangement, SeatArrangement::TwoTwo);

        let query: SeatMapQuery =
            serde_json::from_str(r#"{"arrangement": "2-1"}"#).expect("2-1");
        assert_eq!(query.arrangement, SeatArrangement::TwoOne);
    }
}
