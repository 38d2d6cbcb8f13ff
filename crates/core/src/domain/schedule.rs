use chrono::{NaiveDate, NaiveTime};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A VC calendar: date -> time slot -> available.
///
/// Entries keep the key order of the JSON object they were read from. Dates
/// are opaque strings here and are not assumed to be in calendar order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    days: Vec<ScheduleDay>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDay {
    pub date: String,
    pub slots: Vec<(String, bool)>,
}

impl Schedule {
    pub fn new(days: Vec<ScheduleDay>) -> Self {
        Self { days }
    }

    pub fn days(&self) -> &[ScheduleDay] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_available(&self, date: &str, time: &str) -> bool {
        self.days
            .iter()
            .filter(|d| d.date == date)
            .flat_map(|d| d.slots.iter())
            .any(|(t, available)| t == time && *available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub date: String,
    pub time: String,
}

/// Every available `(date, time)` pair, in schedule order.
pub fn flatten_available_slots(schedule: &Schedule) -> Vec<AvailableSlot> {
    schedule
        .days
        .iter()
        .flat_map(|day| {
            day.slots
                .iter()
                .filter(|(_, available)| *available)
                .map(move |(time, _)| AvailableSlot {
                    date: day.date.clone(),
                    time: time.clone(),
                })
        })
        .collect()
}

/// Calendar ordering for callers that want it. Slots whose date or time do
/// not parse keep their relative order and sort after the parsed ones.
pub fn sort_slots_chronologically(slots: &mut [AvailableSlot]) {
    slots.sort_by_key(|slot| {
        let date = NaiveDate::parse_from_str(slot.date.trim(), "%Y-%m-%d").ok();
        let time = NaiveTime::parse_from_str(slot.time.trim(), "%H:%M").ok();
        match (date, time) {
            (Some(d), Some(t)) => (false, Some(d.and_time(t))),
            _ => (true, None),
        }
    });
}

/// Meeting request draft. Submitted as-is; the backend validates fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleForm {
    pub date: String,
    pub time_slot: String,
    pub startup_name: String,
    pub founder_name: String,
    pub email: String,
    pub pitch_summary: String,
}

impl ScheduleForm {
    pub fn for_slot(slot: &AvailableSlot) -> Self {
        Self {
            date: slot.date.clone(),
            time_slot: slot.time.clone(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingConfirmation {
    pub meeting_id: String,
    pub vc_name: String,
    pub date: String,
    pub time_slot: String,
    pub startup_name: String,
    pub founder_name: String,
    pub email: String,
    pub pitch_summary: String,
}

impl Serialize for Schedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for day in &self.days {
            map.serialize_entry(&day.date, &SlotsRef(&day.slots))?;
        }
        map.end()
    }
}

struct SlotsRef<'a>(&'a [(String, bool)]);

impl Serialize for SlotsRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (time, available) in self.0 {
            map.serialize_entry(time, available)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = Schedule;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of date -> time slot -> availability")
            }

            fn visit_unit<E>(self) -> Result<Schedule, E> {
                Ok(Schedule::default())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Schedule, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut days = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((date, slots)) = access.next_entry::<String, OrderedSlots>()? {
                    days.push(ScheduleDay {
                        date,
                        slots: slots.0,
                    });
                }
                Ok(Schedule { days })
            }
        }

        deserializer.deserialize_any(ScheduleVisitor)
    }
}

struct OrderedSlots(Vec<(String, bool)>);

impl<'de> Deserialize<'de> for OrderedSlots {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SlotsVisitor;

        impl<'de> Visitor<'de> for SlotsVisitor {
            type Value = OrderedSlots;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of time slot -> availability")
            }

            fn visit_map<A>(self, mut access: A) -> Result<OrderedSlots, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut slots = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((time, available)) = access.next_entry::<String, bool>()? {
                    slots.push((time, available));
                }
                Ok(OrderedSlots(slots))
            }
        }

        deserializer.deserialize_map(SlotsVisitor)
    }
}
