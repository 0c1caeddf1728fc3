//! CSV rendering of the (possibly filtered) roster.

use chrono::{DateTime, Utc};
use fleet_types::{Status, StudentView};

const HEADER: &str = "Name,House,Status,Pirate Start,Pirate End,Days Left,Notes";

/// Render the given views as CSV. Every field is quoted and embedded
/// quotes are doubled, matching the reference export.
pub fn render_csv(views: &[StudentView]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for view in views {
        let s = &view.student;
        let status = match s.status {
            Status::Active => "Active",
            Status::PirateShip => "Pirate Ship",
        };
        let row = [
            s.full_name.clone(),
            s.house.clone().unwrap_or_default(),
            status.to_string(),
            date_field(s.pirate_start),
            date_field(s.pirate_end),
            view.days_left.map(|d| d.to_string()).unwrap_or_default(),
            s.notes.clone(),
        ];
        let quoted: Vec<String> = row.iter().map(|f| quote(f)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    out
}

fn date_field(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use fleet_types::Student;

    #[test]
    fn header_and_quoting() {
        let now = Utc::now();
        let mut s = Student::new("s1".into(), "Alex \"Ace\" Smith".into(), None, "Test");
        s.notes = "likes, commas".into();
        let csv = render_csv(&[StudentView::at(s, now)]);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADER));
        let row = lines.next().unwrap_or_default();
        assert!(row.starts_with("\"Alex \"\"Ace\"\" Smith\","));
        assert!(row.contains("\"likes, commas\""));
        assert!(row.contains("\"Active\""));
    }

    #[test]
    fn pirate_rows_carry_dates_and_countdown() {
        let now = Utc::now();
        let mut s = Student::new("s1".into(), "Blair Jones".into(), Some("Bravo".into()), "Test");
        s.status = Status::PirateShip;
        s.pirate_start = Some(now);
        s.pirate_end = Some(now + Duration::days(14));
        let csv = render_csv(&[StudentView::at(s, now)]);

        let row = csv.lines().nth(1).unwrap_or_default();
        assert!(row.contains("\"Pirate Ship\""));
        assert!(row.contains(&format!("\"{}\"", now.format("%Y-%m-%d"))));
        assert!(row.contains("\"14\""));
    }
}
