use serde_json::Value;

/// Fixed set of calendar actions the model may invoke, in the legacy
/// chat-completions `functions` shape. Single source of truth for what the
/// model sees; execution-side validation lives in `ActionCall::parse`.
#[derive(Clone)]
pub struct ActionRegistry {
    schemas: Value,
}

impl ActionRegistry {
    pub fn new() -> Self {
        let schemas = serde_json::json!([
            {
                "name": "find_available_slots",
                "description": "Find available time slots for booking a meeting",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "event_type_id": {
                            "type": "string",
                            "description": "The ID of the event type to book"
                        },
                        "date": {
                            "type": "string",
                            "description":
                                "The date to find slots for (YYYY-MM-DD format). \
                                 Convert from American format (MM/DD/YYYY) if needed."
                        },
                        "duration": {
                            "type": "integer",
                            "description": "Duration of the meeting in minutes",
                            "default": 30
                        }
                    },
                    "required": ["event_type_id", "date"]
                }
            },
            {
                "name": "create_booking",
                "description": "Create a new booking/meeting",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "event_type_id": {
                            "type": "string",
                            "description": "The ID of the event type to book"
                        },
                        "start_time": {
                            "type": "string",
                            "description": "Start time of the meeting (ISO format)"
                        },
                        "end_time": {
                            "type": "string",
                            "description": "End time of the meeting (ISO format)"
                        },
                        "user_email": {
                            "type": "string",
                            "description": "Email of the person booking the meeting"
                        },
                        "name": {
                            "type": "string",
                            "description": "Name of the person booking the meeting"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Additional notes for the meeting"
                        }
                    },
                    "required": ["event_type_id", "start_time", "end_time", "user_email", "name"]
                }
            },
            {
                "name": "get_user_bookings",
                "description": "Get all scheduled events for a specific user",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "user_email": {
                            "type": "string",
                            "description": "Email of the user to get bookings for"
                        }
                    },
                    "required": ["user_email"]
                }
            },
            {
                "name": "cancel_booking",
                "description": "Cancel a specific booking",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "booking_id": {
                            "type": "string",
                            "description": "The ID of the booking to cancel"
                        }
                    },
                    "required": ["booking_id"]
                }
            },
            {
                "name": "reschedule_booking",
                "description": "Reschedule a booking to a new time",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "booking_id": {
                            "type": "string",
                            "description": "The ID of the booking to reschedule"
                        },
                        "new_start_time": {
                            "type": "string",
                            "description": "New start time (ISO format)"
                        },
                        "new_end_time": {
                            "type": "string",
                            "description": "New end time (ISO format)"
                        }
                    },
                    "required": ["booking_id", "new_start_time", "new_end_time"]
                }
            },
            {
                "name": "get_event_types",
                "description": "Get available event types for booking",
                "parameters": {
                    "type": "object",
                    "properties": {}
                }
            },
            {
                "name": "create_event_type",
                "description": "Create a new event type in the calendar service",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description":
                                "The title/name of the event type (e.g., '30-minute consultation')"
                        },
                        "duration": {
                            "type": "integer",
                            "description": "Duration of the event in minutes",
                            "default": 30
                        },
                        "description": {
                            "type": "string",
                            "description": "Description of the event type",
                            "default": ""
                        },
                        "slug": {
                            "type": "string",
                            "description":
                                "URL slug for the event type (auto-generated if not provided)"
                        }
                    },
                    "required": ["title"]
                }
            }
        ]);
        Self { schemas }
    }

    pub fn schemas(&self) -> &Value {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.as_array().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered action names, in schema order.
    pub fn names(&self) -> Vec<&str> {
        self.schemas
            .as_array()
            .map(|a| a.iter().filter_map(|f| f["name"].as_str()).collect())
            .unwrap_or_default()
    }
}
