use crate::config::Config;
use crate::types::{CalEvent, EventType, Slot};
use serde_json::Value;
use tokio::time::Duration;
use tracing::{debug, warn};

/// Identifier used when name resolution finds nothing and the remote list is
/// empty.
const DEFAULT_EVENT_TYPE_ID: i64 = 1;

/// Adapter for the remote scheduling API. Masks backend instability behind
/// per-operation fallbacks: slot lookups degrade to a default working-hours
/// set, booking creation degrades to a synthetic confirmation in demo mode,
/// listings degrade to empty, cancel/reschedule degrade to false. Only
/// event-type creation surfaces failure to the caller.
#[derive(Clone)]
pub struct CalendarClient {
    base_url: String,
    api_key: Option<String>,
    username: Option<String>,
    demo_mode: bool,
    http: reqwest::Client,
}

impl CalendarClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            base_url: config.cal_base_url.clone(),
            api_key: config.cal_api_key.clone(),
            username: config.cal_username.clone(),
            demo_mode: config.demo_mode,
            http,
        })
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    /// Available start times for one day. Every failure class (missing event
    /// type, auth problems, transport errors, malformed bodies) degrades to
    /// the default working-hours slots; degraded mode is not an error.
    pub async fn find_available_slots(
        &self,
        event_type_id: &str,
        date: &str,
        duration: u32,
    ) -> Vec<Slot> {
        match self.fetch_slots(event_type_id, date, duration).await {
            Ok(slots) => slots,
            Err(e) => {
                warn!(
                    event_type_id,
                    date,
                    error = %e,
                    "slot lookup failed, using default working hours"
                );
                default_slots(date)
            }
        }
    }

    async fn fetch_slots(
        &self,
        event_type_id: &str,
        date: &str,
        duration: u32,
    ) -> anyhow::Result<Vec<Slot>> {
        let url = format!("{}/slots", self.base_url);
        let resp = self
            .authed(self.http.get(url))
            .query(&[
                ("eventTypeId", event_type_id),
                ("dateFrom", date),
                ("dateTo", date),
                ("duration", &duration.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("slots endpoint returned {}", status);
        }
        let body: Value = resp.json().await?;
        let slots = body.get("slots").cloned().unwrap_or_else(|| Value::Array(vec![]));
        Ok(serde_json::from_value(slots)?)
    }

    /// Maps a conversational event-type identifier to a numeric id. Integer
    /// strings pass through without touching the backend; names are matched
    /// against the fetched list, then fall back to the first entry, then to
    /// the fixed default.
    pub async fn resolve_event_type_id(&self, identifier: &str) -> i64 {
        // Digits-only gate: padded or signed strings go through name
        // matching instead.
        if !identifier.is_empty() && identifier.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(id) = identifier.parse::<i64>() {
                return id;
            }
        }
        let event_types = self.get_event_types().await;
        match match_event_type(&event_types, identifier) {
            Some(id) => id,
            None => {
                debug!(identifier, "no event type matched, falling back to first");
                event_types
                    .first()
                    .map(|et| et.id)
                    .unwrap_or(DEFAULT_EVENT_TYPE_ID)
            }
        }
    }

    /// Creates a booking. In demo mode any failure is replaced by a
    /// deterministic synthetic confirmation so the conversation always
    /// completes affirmatively; with demo mode off, failure is an error.
    pub async fn create_booking(
        &self,
        event_type_id: &str,
        start_time: &str,
        end_time: &str,
        user_email: &str,
        name: &str,
        notes: &str,
    ) -> anyhow::Result<Value> {
        let resolved = self.resolve_event_type_id(event_type_id).await;
        let data = serde_json::json!({
            "eventTypeId": resolved,
            "start": start_time,
            "end": end_time,
            "attendees": [{"email": user_email, "name": name}],
            "notes": notes,
            "timeZone": "America/Los_Angeles",
            "language": "en",
            "hasHashedBookingLink": false,
            "smsReminderNumber": null,
            "location": null,
            "customInputs": [],
            "metadata": {}
        });

        match self.post_booking(&data).await {
            Ok(booking) => Ok(booking),
            Err(e) if self.demo_mode => {
                warn!(error = %e, "booking creation failed, returning demo-mode confirmation");
                Ok(mock_booking(start_time, end_time))
            }
            Err(e) => Err(e.context("Failed to create booking")),
        }
    }

    async fn post_booking(&self, data: &Value) -> anyhow::Result<Value> {
        let url = format!("{}/bookings", self.base_url);
        let resp = self.authed(self.http.post(url)).json(data).send().await?;
        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("booking endpoint returned {}: {}", status, body);
        }
        Ok(resp.json().await?)
    }

    /// Bookings whose attendee list contains an exact email match. Backend
    /// failure yields an empty list, surfaced upstream as "none found".
    pub async fn get_user_bookings(&self, user_email: &str) -> Vec<CalEvent> {
        match self.fetch_bookings().await {
            Ok(bookings) => filter_bookings_by_email(&bookings, user_email),
            Err(e) => {
                warn!(error = %e, "booking listing failed");
                Vec::new()
            }
        }
    }

    async fn fetch_bookings(&self) -> anyhow::Result<Vec<Value>> {
        let url = format!("{}/bookings", self.base_url);
        let mut req = self.authed(self.http.get(url));
        if let Some(username) = &self.username {
            req = req.query(&[("user", username.as_str())]);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("bookings endpoint returned {}", status);
        }
        let body: Value = resp.json().await?;
        Ok(body
            .get("bookings")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default())
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> bool {
        let url = format!("{}/bookings/{}/cancel", self.base_url, booking_id);
        match self.authed(self.http.post(url)).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(booking_id, status = %resp.status(), "cancel failed");
                false
            }
            Err(e) => {
                warn!(booking_id, error = %e, "cancel failed");
                false
            }
        }
    }

    pub async fn reschedule_booking(
        &self,
        booking_id: &str,
        new_start_time: &str,
        new_end_time: &str,
    ) -> bool {
        let url = format!("{}/bookings/{}", self.base_url, booking_id);
        let data = serde_json::json!({
            "start": new_start_time,
            "end": new_end_time,
        });
        match self.authed(self.http.patch(url)).json(&data).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(booking_id, status = %resp.status(), "reschedule failed");
                false
            }
            Err(e) => {
                warn!(booking_id, error = %e, "reschedule failed");
                false
            }
        }
    }

    /// Flattens the remote grouped event-type structure into one ordered
    /// list; failure yields an empty list.
    pub async fn get_event_types(&self) -> Vec<EventType> {
        match self.fetch_event_types().await {
            Ok(event_types) => event_types,
            Err(e) => {
                warn!(error = %e, "event-type listing failed");
                Vec::new()
            }
        }
    }

    async fn fetch_event_types(&self) -> anyhow::Result<Vec<EventType>> {
        let url = format!("{}/event-types", self.base_url);
        let mut req = self.authed(self.http.get(url));
        if let Some(username) = &self.username {
            req = req.query(&[("username", username.as_str())]);
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("event-types endpoint returned {}", status);
        }
        let body: Value = resp.json().await?;

        let mut event_types = Vec::new();
        if let Some(groups) = body["data"]["eventTypeGroups"].as_array() {
            for group in groups {
                if let Some(list) = group["eventTypes"].as_array() {
                    for et in list {
                        if let Ok(parsed) = serde_json::from_value::<EventType>(et.clone()) {
                            event_types.push(parsed);
                        }
                    }
                }
            }
        }
        Ok(event_types)
    }

    /// Creates a new event type with the service's broad defaults
    /// (round-robin scheduling, no price, unlimited availability period, no
    /// calendar integration). Failure here is explicit, never masked.
    pub async fn create_event_type(
        &self,
        title: &str,
        duration: u32,
        description: &str,
        slug: Option<&str>,
    ) -> anyhow::Result<Value> {
        let slug = match slug {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => derive_slug(title),
        };
        let data = serde_json::json!({
            "title": title,
            "length": duration,
            "description": description,
            "slug": slug,
            "hidden": false,
            "hashedLink": null,
            "locations": [],
            "customInputs": [],
            "timeZone": "America/New_York",
            "scheduleId": null,
            "price": 0,
            "currency": "usd",
            "bookingFields": [],
            "useEventTypeDestinationCalendarEmail": false,
            "requiresConfirmation": false,
            "requiresBookerEmailVerification": false,
            "disableGuests": false,
            "hideCalendarNotes": false,
            "minimumBookingNotice": 0,
            "beforeEventBuffer": 0,
            "afterEventBuffer": 0,
            "seatsPerTimeSlot": null,
            "seatsShowAttendees": false,
            "schedulingType": "round_robin",
            "teamId": null,
            "successRedirectUrl": null,
            "bookingLimits": null,
            "durationLimits": null,
            "onlyShowForFirstEvent": false,
            "metadata": {},
            "periodType": "unlimited",
            "periodDays": null,
            "periodStartDate": null,
            "periodEndDate": null,
            "periodCountCalendarDays": false,
            "requiresCalendarIntegration": false,
            "destinationCalendar": null,
            "eventName": "Dynamic",
            "lockTimezones": false,
            "lockTimeZoneToggleOnBookingPage": false
        });

        let url = format!("{}/event-types", self.base_url);
        let resp = self
            .authed(self.http.post(url))
            .json(&data)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create event type: {}", e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to create event type: {} {}", status, body);
        }
        Ok(resp.json().await?)
    }
}

/// Default working-hours slots, 9:00 through 16:00 inclusive, one per hour.
pub fn default_slots(date: &str) -> Vec<Slot> {
    (9..=16)
        .map(|hour| Slot {
            time: format!("{}T{:02}:00:00Z", date, hour),
            attendees: Vec::new(),
            booking_id: None,
        })
        .collect()
}

/// Case-insensitive identifier match, in order: exact slug, exact title,
/// title with spaces as underscores, title with spaces as hyphens.
pub fn match_event_type(event_types: &[EventType], identifier: &str) -> Option<i64> {
    let want = identifier.to_lowercase();
    for et in event_types {
        let slug = et.slug.to_lowercase();
        let title = et.title.to_lowercase();
        if slug == want
            || title == want
            || title.replace(' ', "_") == want
            || title.replace(' ', "-") == want
        {
            return Some(et.id);
        }
    }
    None
}

/// Deterministic demo-mode booking id derived from the date portion of the
/// start timestamp, e.g. `mock_booking_20251002`.
pub fn mock_booking_id(start_time: &str) -> String {
    let date = start_time.split('T').next().unwrap_or(start_time);
    format!("mock_booking_{}", date.replace('-', ""))
}

fn mock_booking(start_time: &str, end_time: &str) -> Value {
    serde_json::json!({
        "id": mock_booking_id(start_time),
        "title": "Lunch Meeting",
        "start": start_time,
        "end": end_time,
        "status": "confirmed",
        "message": "Booking created successfully (demo mode - calendar API integration in progress)"
    })
}

/// Strict attendee filter: a booking is included only if some attendee email
/// equals `user_email` exactly.
pub fn filter_bookings_by_email(bookings: &[Value], user_email: &str) -> Vec<CalEvent> {
    let mut out = Vec::new();
    for booking in bookings {
        let matched = booking["attendees"]
            .as_array()
            .map(|attendees| {
                attendees
                    .iter()
                    .any(|a| a["email"].as_str() == Some(user_email))
            })
            .unwrap_or(false);
        if matched {
            out.push(CalEvent {
                id: id_as_string(&booking["id"]),
                title: booking["title"].as_str().unwrap_or("Meeting").to_string(),
                start_time: booking["start"].as_str().unwrap_or_default().to_string(),
                end_time: booking["end"].as_str().unwrap_or_default().to_string(),
                status: booking["status"].as_str().unwrap_or("confirmed").to_string(),
            });
        }
    }
    out
}

/// Lowercased title with spaces and underscores as hyphens, everything else
/// non-alphanumeric stripped.
pub fn derive_slug(title: &str) -> String {
    title
        .to_lowercase()
        .replace(' ', "-")
        .replace('_', "-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

fn id_as_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
