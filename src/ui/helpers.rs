use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::models::{Boat, Location};

/// Short location text for the table's location column.
pub(crate) fn location_label(location: &Location) -> String {
    match location {
        Location::Slip(number) | Location::Storage(number) => format!("# {number}"),
        Location::Land(bay) => format!("bay {bay}"),
        Location::Trailer(tag) => tag.clone(),
        Location::Unknown => String::new(),
    }
}

/// One fixed-width line of the console inventory listing.
pub(crate) fn listing_row(boat: &Boat) -> String {
    let location = match &boat.location {
        Location::Slip(number) | Location::Storage(number) => format!("  # {number:<6}"),
        Location::Land(bay) => format!("     {bay:<6}"),
        Location::Trailer(tag) => format!("  {tag:<8}"),
        Location::Unknown => " ".repeat(10),
    };
    format!(
        "{:<20} {:>4}'    {:<8}{}   Owes ${:>7}",
        boat.name,
        boat.length,
        boat.place().as_str(),
        location,
        boat.amount_owed
    )
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
