// Calendar "today" for a classification batch and the due-date bucketer

use chrono::{DateTime, Days, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc};
use serde::Serialize;

/// The calendar date a batch of tasks is triaged against, in a time zone.
///
/// Built once per board render and passed down, so every task on a page
/// shares the same bucket boundaries. Each due timestamp is converted with
/// the zone's offset at that instant, so dates on either side of a DST
/// change keep their own calendar day.
#[derive(Debug, Clone)]
pub struct Today<Tz: TimeZone = Local> {
    date: NaiveDate,
    tz: Tz,
}

impl<Tz: TimeZone> Today<Tz> {
    pub fn new(date: NaiveDate, tz: Tz) -> Self {
        Self { date, tz }
    }

    /// The calendar date of `now` in its own timezone
    pub fn from_datetime(now: &DateTime<Tz>) -> Self {
        Self::new(now.date_naive(), now.timezone())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Calendar date of a Unix timestamp in this batch's zone.
    /// `None` for timestamps chrono cannot represent.
    pub fn date_of(&self, ts: i64) -> Option<NaiveDate> {
        DateTime::from_timestamp(ts, 0).map(|dt| dt.with_timezone(&self.tz).date_naive())
    }

    /// Unix timestamp of the first instant of `date` in this zone.
    /// Zones that skip midnight start the day at the first hour that exists.
    pub fn start_of(&self, date: NaiveDate) -> Option<i64> {
        (0..24).find_map(|hour| {
            let local = date.and_hms_opt(hour, 0, 0)?;
            self.tz.from_local_datetime(&local).earliest()
        })
        .map(|dt| dt.timestamp())
    }

    /// Unix timestamp of midnight `days_ahead` days from today
    pub fn midnight_ts(&self, days_ahead: u64) -> Option<i64> {
        let date = self.date.checked_add_days(Days::new(days_ahead))?;
        self.start_of(date)
    }
}

impl Today<FixedOffset> {
    /// Today in UTC
    pub fn utc(date: NaiveDate) -> Self {
        Self::new(date, Utc.fix())
    }
}

impl Today<Local> {
    /// Read the local clock. Only the CLI layer calls this.
    pub fn now_local() -> Self {
        Self::from_datetime(&Local::now())
    }

    /// A given date in the local zone
    pub fn local(date: NaiveDate) -> Self {
        Self::new(date, Local)
    }
}

/// Where a due date falls relative to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBucket {
    NoDueDate,
    Overdue,
    Today,
    Tomorrow,
    NextDay,
    Later,
}

/// Bucket a due timestamp by whole calendar days from today.
///
/// Both sides are dates, so 00:00:00 and 23:59:59 on the same day land in
/// the same bucket. Unrepresentable timestamps count as no due date.
pub fn due_bucket<Tz: TimeZone>(due_ts: Option<i64>, today: &Today<Tz>) -> DueBucket {
    let Some(due) = due_ts.and_then(|ts| today.date_of(ts)) else {
        return DueBucket::NoDueDate;
    };

    match (due - today.date()).num_days() {
        d if d < 0 => DueBucket::Overdue,
        0 => DueBucket::Today,
        1 => DueBucket::Tomorrow,
        2 => DueBucket::NextDay,
        _ => DueBucket::Later,
    }
}
