use crate::models::{FastingStatus, FastingUpdate, MarkDayRequest};

pub fn status_for(completed: bool) -> FastingStatus {
    if completed {
        FastingStatus::Completed
    } else {
        FastingStatus::Skipped
    }
}

/// Translates a mark-day request into a regular partial update with the
/// status forced.
pub fn as_update(request: &MarkDayRequest) -> FastingUpdate {
    FastingUpdate {
        date: request.date.clone(),
        status: Some(status_for(request.completed).label().to_string()),
        weight_kg: request.weight_kg.clone(),
        energy_level: request.energy_level.clone(),
        note: request.note.clone(),
        ..FastingUpdate::default()
    }
}
