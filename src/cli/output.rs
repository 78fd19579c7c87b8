//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use itertools::Itertools;

use crate::domain::Entity;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// One line per team: name, then parent and child count when present.
pub fn format_entity(entity: &Entity) -> String {
    let details = [
        entity.parent.as_ref().map(|p| format!("parent: {p}")),
        entity.child_count.map(|c| format!("children: {c}")),
    ]
    .into_iter()
    .flatten()
    .join(", ");

    if details.is_empty() {
        entity.name.clone()
    } else {
        format!("{} ({})", entity.name, details)
    }
}

/// Print teams, or a dimmed placeholder when there are none.
pub fn entities(list: &[Entity]) {
    if list.is_empty() {
        println!("{}", "(none)".dimmed());
        return;
    }
    for entity in list {
        println!("  {}", format_entity(entity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_child_with_count_when_formatting_then_lists_details() {
        let entity = Entity::child("Team1", "BU1").with_child_count(3);
        assert_eq!(format_entity(&entity), "Team1 (parent: BU1, children: 3)");
    }

    #[test]
    fn given_plain_root_when_formatting_then_prints_name_only() {
        assert_eq!(format_entity(&Entity::root("BU2")), "BU2");
    }
}
