use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    // Legacy files carry localized labels; anything unrecognized lands on Medium.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            "High" | "Высокий" => Priority::High,
            "Medium" | "Средний" => Priority::Medium,
            "Low" | "Низкий" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Priority::from_label(&raw)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub title: String,

    pub description: String,

    pub deadline: NaiveDateTime,

    pub priority: Priority,

    pub is_completed: bool,
}

impl Task {
    pub fn new(title: String, description: String, deadline: NaiveDateTime, priority: Priority) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            deadline,
            priority,
            is_completed: false,
        }
    }

    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Priority, Task};

    fn noon(year: i32, month: u32, day: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .expect("valid date")
            .and_hms_opt(12, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn legacy_priority_labels_normalize_to_canonical() {
        assert_eq!(Priority::from_label("Высокий"), Priority::High);
        assert_eq!(Priority::from_label("Средний"), Priority::Medium);
        assert_eq!(Priority::from_label("Низкий"), Priority::Low);
        assert_eq!(Priority::from_label("High"), Priority::High);
    }

    #[test]
    fn unknown_priority_defaults_to_medium() {
        assert_eq!(Priority::from_label("urgent"), Priority::Medium);
        assert_eq!(Priority::from_label(""), Priority::Medium);
    }

    #[test]
    fn priority_serializes_canonically() {
        let json = serde_json::to_string(&Priority::High).expect("serialize");
        assert_eq!(json, "\"High\"");

        let parsed: Priority = serde_json::from_str("\"Низкий\"").expect("deserialize");
        assert_eq!(parsed, Priority::Low);
    }

    #[test]
    fn deadline_round_trips_as_iso_timestamp() {
        let task = Task::new(
            "Submit report".to_string(),
            String::new(),
            noon(2024, 3, 15),
            Priority::High,
        );

        let json = serde_json::to_string(&task).expect("serialize");
        assert!(json.contains("\"2024-03-15T12:00:00\""));

        let parsed: Task = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, task);
    }

    #[test]
    fn missing_id_is_generated() {
        let raw = r#"{
            "title": "No id",
            "description": "",
            "deadline": "2024-03-15T12:00:00",
            "priority": "Low",
            "is_completed": false
        }"#;
        let a: Task = serde_json::from_str(raw).expect("deserialize");
        let b: Task = serde_json::from_str(raw).expect("deserialize");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn urgency_order_follows_declaration() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }
}
