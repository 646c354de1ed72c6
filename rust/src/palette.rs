//! Display colors for task labels.

/// Color of every External (blocked-interval) event, whatever its label.
pub const EXTERNAL_COLOR: &str = "#dc3545";

/// Color of any task not in the table.
pub const DEFAULT_COLOR: &str = "#6c757d";

/// Fixed task -> color table.
pub fn task_color(task: &str) -> &'static str {
    match task {
        "Reservations" => "#007bff",
        "Dispatch" => "#28a745",
        "Lunch" => "#ffc107",
        "Journey Desk" => "#6610f2",
        "Network" => "#fd7e14",
        "Badges/Projects" => "#20c997",
        "Scheduling" => "#e83e8c",
        "Marketing" => "#17a2b8",
        "Security" => "#343a40",
        "Sales" => "#d63384",
        _ => DEFAULT_COLOR,
    }
}
