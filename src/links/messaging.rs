use crate::fetcher::catalog::UnitCard;
use crate::types::{Project, ProjectSection, Unit};

use super::encode_component;

pub const DEFAULT_WHATSAPP_PHONE: &str = "966570109444";
pub const DEFAULT_WHATSAPP_MESSAGE: &str = "مرحباً، أستفسر عن مشاريع صفوة عنان العقارية.";

/// `https://wa.me/<phone>?text=<message>`. Non-digits are stripped from the
/// phone number; a blank message omits the `text` parameter.
pub fn whatsapp_link(phone: &str, message: Option<&str>) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match message.filter(|m| !m.trim().is_empty()) {
        Some(message) => format!("https://wa.me/{digits}?text={}", encode_component(message)),
        None => format!("https://wa.me/{digits}"),
    }
}

/// Booking request sent from the unit gallery.
pub fn unit_booking_message(card: &UnitCard) -> String {
    format!("أرغب بحجز {} في {}", card.title, card.project_name)
}

/// Short inquiry sent from a unit gallery card.
pub fn unit_inquiry_message(card: &UnitCard) -> String {
    format!("استفسار عن {}", card.title)
}

/// Viewing request sent from a unit on the project page.
pub fn unit_viewing_message(unit: &Unit, project: &Project, sections: &[ProjectSection]) -> String {
    let number = if unit.unit_number.is_empty() {
        String::new()
    } else {
        format!("- {}", unit.unit_number)
    };
    let section = match &unit.section_id {
        Some(id) => {
            let name = sections
                .iter()
                .find(|s| &s.id == id)
                .map(|s| s.name.as_str())
                .unwrap_or_default();
            format!(" - قسم {name}")
        }
        None => String::new(),
    };
    format!(
        "أرغب في حجز معاينة للوحدة: {} {number} في مشروع {}{section}",
        unit.unit_type, project.name
    )
}

/// Site visit request sent from the project page.
pub fn project_visit_message(project: &Project) -> String {
    format!("أرغب في حجز موعد لزيارة مشروع {}", project.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whatsapp_link_encodes_message() {
        assert_eq!(
            whatsapp_link("+966 57 010 9444", Some("a b")),
            "https://wa.me/966570109444?text=a%20b"
        );
        assert_eq!(whatsapp_link(DEFAULT_WHATSAPP_PHONE, Some("  ")), "https://wa.me/966570109444");
    }

    #[test]
    fn test_booking_message() {
        let card = UnitCard {
            title: "نموذج A".to_string(),
            project_name: "حياة".to_string(),
            ..Default::default()
        };
        assert_eq!(unit_booking_message(&card), "أرغب بحجز نموذج A في حياة");
        assert_eq!(unit_inquiry_message(&card), "استفسار عن نموذج A");
    }

    #[test]
    fn test_viewing_message_names_section() {
        let project = Project {
            name: "حياة".to_string(),
            ..Default::default()
        };
        let sections = vec![ProjectSection {
            id: "s1".to_string(),
            name: "المرحلة الأولى".to_string(),
            ..Default::default()
        }];
        let unit = Unit {
            unit_type: "فيلا".to_string(),
            unit_number: "A-1".to_string(),
            section_id: Some("s1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            unit_viewing_message(&unit, &project, &sections),
            "أرغب في حجز معاينة للوحدة: فيلا - A-1 في مشروع حياة - قسم المرحلة الأولى"
        );
        assert_eq!(
            project_visit_message(&project),
            "أرغب في حجز موعد لزيارة مشروع حياة"
        );
    }
}
