//! iCalendar rendering of parsed schedule events.

use icalendar::{
    Calendar, CalendarDateTime, Component, DatePerhapsTime, Event, EventLike, Property,
};

use crate::schedule::{Attendee, ScheduleEvent};

/// Calendar-wide rendering options.
#[derive(Debug, Clone)]
pub struct CalendarOptions {
    /// Calendar display name.
    pub name: String,
    /// Prepended to every summary as `{prefix}: {event name}`.
    pub summary_prefix: Option<String>,
    /// IANA timezone the event times are expressed in.
    pub timezone: String,
    /// Domain used to build attendee addresses.
    pub domain: String,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            name: "Sailing Schedule".to_string(),
            summary_prefix: None,
            timezone: "UTC".to_string(),
            domain: "localhost".to_string(),
        }
    }
}

/// Builds the `MAILTO:` address for a crew member.
///
/// Crew members have no real address, so the local part is the MD5 hex
/// digest of their name.
pub fn attendee_address(name: &str, domain: &str) -> String {
    format!("MAILTO:{:x}@{}", md5::compute(name.as_bytes()), domain)
}

fn event_uid(event: &ScheduleEvent, domain: &str) -> String {
    let seed = format!("{}|{}", event.name, event.start);
    format!("{:x}@{}", md5::compute(seed.as_bytes()), domain)
}

fn summary(event: &ScheduleEvent, options: &CalendarOptions) -> String {
    match options.summary_prefix.as_deref() {
        Some(prefix) if !prefix.is_empty() => format!("{}: {}", prefix, event.name),
        _ => event.name.clone(),
    }
}

fn attendee_property(attendee: &Attendee, domain: &str) -> Property {
    let address = attendee_address(&attendee.name, domain);
    Property::new("ATTENDEE", address.as_str())
        .add_parameter("CN", attendee.name.as_str())
        .add_parameter("ROLE", "REQ-PARTICIPANT")
        .add_parameter("PARTSTAT", attendee.status.partstat())
        .add_parameter("RSVP", "FALSE")
        .done()
}

fn local_time(date_time: chrono::NaiveDateTime, timezone: &str) -> DatePerhapsTime {
    DatePerhapsTime::DateTime(CalendarDateTime::WithTimezone {
        date_time,
        tzid: timezone.to_string(),
    })
}

fn product_id(name: &str) -> String {
    format!("-//{}//Calendar//EN", name)
}

/// Converts one schedule event into a VEVENT.
pub fn to_ical_event(event: &ScheduleEvent, options: &CalendarOptions) -> Event {
    let mut ical = Event::new();
    ical.uid(&event_uid(event, &options.domain))
        .summary(&summary(event, options))
        .starts(local_time(event.start, &options.timezone))
        .ends(local_time(event.end, &options.timezone));

    if !event.location.is_empty() {
        ical.location(&event.location);
    }

    for attendee in &event.attendees {
        ical.append_multi_property(attendee_property(attendee, &options.domain));
    }

    ical.done()
}

/// Renders events as an iCalendar document.
pub fn render_calendar(events: &[ScheduleEvent], options: &CalendarOptions) -> String {
    let mut calendar = Calendar::empty();
    calendar
        .append_property(("VERSION", "2.0"))
        .append_property(("PRODID", product_id(&options.name).as_str()))
        .name(&options.name);
    for event in events {
        calendar.push(to_ical_event(event, options));
    }
    calendar.done().to_string()
}
