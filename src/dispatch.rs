use crate::action_registry::ActionRegistry;
use crate::actions::ActionCall;
use crate::calendar::CalendarClient;
use crate::llm_client::LlmClientTrait;
use crate::types::{ChatRequest, ChatResponse, Message};
use serde_json::Value;
use tokio::time::{Duration, timeout};
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "\
You are a helpful assistant that helps users book meetings and manage their calendar.
You can help users:
- Book new meetings by asking for details like date, time, and reason
- Show scheduled events for a user
- Cancel events
- Reschedule events
- Create new event types when they don't exist

IMPORTANT:
- Only ask for the user's email if they haven't already provided it in the current conversation. If they have already shared their email, remember it and use it for subsequent requests.
- Always use American date format (MM/DD/YYYY) when discussing dates with users. For example: 10/02/2025 for October 2nd, 2025.
- When calling functions that require dates, convert American format to ISO format (YYYY-MM-DD) for the API.
- If a user wants to book a meeting but no suitable event type exists, offer to create one for them.
- When a user provides all necessary booking details (event type, date, time, duration, email), automatically proceed to create the booking using the create_booking function.
- After finding available slots, if the user confirms or provides complete booking details, create the booking immediately.
- If a user says \"yes\" or confirms a booking after you've shown them event types or available slots, immediately call the create_booking function with the details you have.
- Don't ask for additional information if you already have all the necessary details to create a booking.
- When a user provides a complete booking request (event type, date, time, duration, email), immediately call create_booking without asking for confirmation.
Be friendly and helpful in your responses.";

const UNAVAILABLE_REPLY: &str =
    "Sorry, the AI service is currently unavailable. Please try again later.";

#[derive(Clone)]
pub struct DispatchOptions {
    /// Upper bound on each model round trip, on top of the HTTP client's own
    /// request timeout.
    pub step_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(90),
        }
    }
}

/// Orchestration core for one chat turn: ask the model for a reply or an
/// action, execute at most one action against the calendar backend, fold the
/// result back into the conversation, and ask the model for the final reply.
pub struct DispatchEngine {
    llm: Box<dyn LlmClientTrait>,
    calendar: CalendarClient,
    registry: ActionRegistry,
    opts: DispatchOptions,
}

impl DispatchEngine {
    pub fn new(
        llm: Box<dyn LlmClientTrait>,
        calendar: CalendarClient,
        registry: ActionRegistry,
        opts: DispatchOptions,
    ) -> Self {
        Self {
            llm,
            calendar,
            registry,
            opts,
        }
    }

    /// Inbound chat operation. Caller-supplied history is used verbatim (the
    /// caller owns persistence and includes its latest user message there);
    /// otherwise the conversation is seeded with the persona prompt and the
    /// user's message. A supplied email becomes an early system message so
    /// the model need not re-ask for it.
    pub async fn handle_chat(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        let mut messages = match &request.history {
            Some(history) if !history.is_empty() => history.clone(),
            _ => vec![
                Message::system(SYSTEM_PROMPT),
                Message::user(request.message.clone()),
            ],
        };
        if let Some(email) = &request.user_email {
            messages.insert(1, Message::system(format!("User's email: {}", email)));
        }
        self.complete_turn(&mut messages).await
    }

    /// Same turn state machine over a caller-owned transcript; used by the
    /// REPL so action results survive across turns.
    pub async fn run_turn(
        &self,
        messages: &mut Vec<Message>,
        user_message: &str,
        user_email: Option<&str>,
    ) -> anyhow::Result<ChatResponse> {
        if messages.is_empty() {
            messages.push(Message::system(SYSTEM_PROMPT));
            if let Some(email) = user_email {
                messages.push(Message::system(format!("User's email: {}", email)));
            }
        }
        messages.push(Message::user(user_message));
        self.complete_turn(messages).await
    }

    async fn complete_turn(&self, messages: &mut Vec<Message>) -> anyhow::Result<ChatResponse> {
        let first = match timeout(
            self.opts.step_timeout,
            self.llm.chat_once(messages, self.registry.schemas()),
        )
        .await
        {
            Ok(Ok(msg)) => msg,
            Ok(Err(e)) => {
                warn!(error = %e, "model call failed");
                return Ok(decline(Vec::new()));
            }
            Err(_) => {
                warn!("model call timed out");
                return Ok(decline(Vec::new()));
            }
        };

        let (content, function_call) = match &first {
            Message::Assistant {
                content,
                function_call,
            } => (content.clone(), function_call.clone()),
            _ => anyhow::bail!("model returned a non-assistant message"),
        };

        let Some(call) = function_call else {
            messages.push(first);
            return Ok(ChatResponse {
                response: content.unwrap_or_default(),
                functions_called: Vec::new(),
            });
        };

        info!(action = %call.name, "executing action");
        let functions_called = vec![call.name.clone()];
        let result = self.execute(&call.name, &call.arguments).await?;

        messages.push(first);
        messages.push(Message::function_result(call.name.clone(), result));

        let final_msg = match timeout(
            self.opts.step_timeout,
            self.llm.chat_once_no_functions(messages),
        )
        .await
        {
            Ok(Ok(msg)) => msg,
            Ok(Err(e)) => {
                warn!(error = %e, "final model call failed");
                return Ok(decline(functions_called));
            }
            Err(_) => {
                warn!("final model call timed out");
                return Ok(decline(functions_called));
            }
        };

        let response = match &final_msg {
            Message::Assistant { content, .. } => content.clone().unwrap_or_default(),
            _ => String::new(),
        };
        messages.push(final_msg);

        Ok(ChatResponse {
            response,
            functions_called,
        })
    }

    /// Executes one model-requested action and renders its result as the
    /// human-readable summary fed back to the model. Unregistered names are
    /// reported in-band, not as failures.
    async fn execute(&self, name: &str, arguments: &str) -> anyhow::Result<String> {
        let Some(call) = ActionCall::parse(name, arguments)? else {
            warn!(name, "model requested unregistered action");
            return Ok("Function not implemented".to_string());
        };

        let summary = match call {
            ActionCall::FindAvailableSlots(args) => {
                let slots = self
                    .calendar
                    .find_available_slots(&args.event_type_id, &args.date, args.duration)
                    .await;
                format!("Available slots: {}", serde_json::to_string_pretty(&slots)?)
            }
            ActionCall::CreateBooking(args) => {
                let booking = self
                    .calendar
                    .create_booking(
                        &args.event_type_id,
                        &args.start_time,
                        &args.end_time,
                        &args.user_email,
                        &args.name,
                        &args.notes,
                    )
                    .await?;
                format!(
                    "Booking created successfully! Booking ID: {}",
                    display_id(&booking["id"])
                )
            }
            ActionCall::GetUserBookings(args) => {
                let bookings = self.calendar.get_user_bookings(&args.user_email).await;
                if bookings.is_empty() {
                    "No scheduled events found for this email.".to_string()
                } else {
                    let lines: Vec<String> = bookings
                        .iter()
                        .map(|b| {
                            format!("- {} on {} (Status: {})", b.title, b.start_time, b.status)
                        })
                        .collect();
                    format!("Your scheduled events:\n{}", lines.join("\n"))
                }
            }
            ActionCall::CancelBooking(args) => {
                if self.calendar.cancel_booking(&args.booking_id).await {
                    "Booking cancelled successfully!".to_string()
                } else {
                    "Failed to cancel booking.".to_string()
                }
            }
            ActionCall::RescheduleBooking(args) => {
                if self
                    .calendar
                    .reschedule_booking(
                        &args.booking_id,
                        &args.new_start_time,
                        &args.new_end_time,
                    )
                    .await
                {
                    "Booking rescheduled successfully!".to_string()
                } else {
                    "Failed to reschedule booking.".to_string()
                }
            }
            ActionCall::GetEventTypes => {
                let event_types = self.calendar.get_event_types().await;
                format!(
                    "Available event types: {}",
                    serde_json::to_string_pretty(&event_types)?
                )
            }
            ActionCall::CreateEventType(args) => {
                let event_type = self
                    .calendar
                    .create_event_type(
                        &args.title,
                        args.duration,
                        &args.description,
                        args.slug.as_deref(),
                    )
                    .await?;
                format!(
                    "Event type created successfully! Event type ID: {}, Title: {}",
                    display_id(&event_type["id"]),
                    event_type["title"].as_str().unwrap_or(&args.title)
                )
            }
        };
        Ok(summary)
    }
}

fn decline(functions_called: Vec<String>) -> ChatResponse {
    ChatResponse {
        response: UNAVAILABLE_REPLY.to_string(),
        functions_called,
    }
}

fn display_id(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
