use serde::Deserialize;

fn default_duration() -> u32 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct FindAvailableSlotsArgs {
    pub event_type_id: String,
    /// ISO date, YYYY-MM-DD.
    pub date: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateBookingArgs {
    pub event_type_id: String,
    pub start_time: String,
    pub end_time: String,
    pub user_email: String,
    pub name: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GetUserBookingsArgs {
    pub user_email: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CancelBookingArgs {
    pub booking_id: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RescheduleBookingArgs {
    pub booking_id: String,
    pub new_start_time: String,
    pub new_end_time: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CreateEventTypeArgs {
    pub title: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// One variant per registered action, each carrying its typed arguments.
/// Construction validates the model's raw argument JSON, so a call with
/// missing required arguments never reaches the backend adapter.
#[derive(Clone, Debug)]
pub enum ActionCall {
    FindAvailableSlots(FindAvailableSlotsArgs),
    CreateBooking(CreateBookingArgs),
    GetUserBookings(GetUserBookingsArgs),
    CancelBooking(CancelBookingArgs),
    RescheduleBooking(RescheduleBookingArgs),
    GetEventTypes,
    CreateEventType(CreateEventTypeArgs),
}

impl ActionCall {
    /// Parses a model-produced function call. `Ok(None)` means the name is
    /// not in the registry; argument JSON that fails validation for a known
    /// name is an error.
    pub fn parse(name: &str, arguments: &str) -> anyhow::Result<Option<ActionCall>> {
        let raw = if arguments.trim().is_empty() {
            "{}"
        } else {
            arguments
        };
        let bad_args = |e: serde_json::Error| {
            anyhow::anyhow!("Invalid arguments for '{}': {}. Raw arguments: {}", name, e, raw)
        };

        let call = match name {
            "find_available_slots" => {
                ActionCall::FindAvailableSlots(serde_json::from_str(raw).map_err(bad_args)?)
            }
            "create_booking" => {
                ActionCall::CreateBooking(serde_json::from_str(raw).map_err(bad_args)?)
            }
            "get_user_bookings" => {
                ActionCall::GetUserBookings(serde_json::from_str(raw).map_err(bad_args)?)
            }
            "cancel_booking" => {
                ActionCall::CancelBooking(serde_json::from_str(raw).map_err(bad_args)?)
            }
            "reschedule_booking" => {
                ActionCall::RescheduleBooking(serde_json::from_str(raw).map_err(bad_args)?)
            }
            "get_event_types" => ActionCall::GetEventTypes,
            "create_event_type" => {
                ActionCall::CreateEventType(serde_json::from_str(raw).map_err(bad_args)?)
            }
            _ => return Ok(None),
        };
        Ok(Some(call))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionCall::FindAvailableSlots(_) => "find_available_slots",
            ActionCall::CreateBooking(_) => "create_booking",
            ActionCall::GetUserBookings(_) => "get_user_bookings",
            ActionCall::CancelBooking(_) => "cancel_booking",
            ActionCall::RescheduleBooking(_) => "reschedule_booking",
            ActionCall::GetEventTypes => "get_event_types",
            ActionCall::CreateEventType(_) => "create_event_type",
        }
    }
}
