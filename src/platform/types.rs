//! Row types for the site's tables. Dates travel as ISO `YYYY-MM-DD`
//! strings; the platform owns parsing and constraints.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::Booking;

    #[test]
    fn booking_round_trips_through_json() {
        let booking = Booking {
            id: Some("b-1".to_string()),
            name: "Jane".to_string(),
            email: "jane@x.com".to_string(),
            check_in: "2026-09-10".to_string(),
            check_out: "2026-09-14".to_string(),
            guests: 2,
            status: "pending".to_string(),
        };

        let json = serde_json::to_string(&booking).expect("Failed to serialize");
        assert!(json.contains("jane@x.com"));

        let deserialized: Booking = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(deserialized.id.as_deref(), Some("b-1"));
        assert_eq!(deserialized.guests, 2);
    }
}
