mod zone;

use log::debug;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};
use crate::transcribe::error::ClogError;

pub use zone::Zone;

const DATE_TIME: &[FormatItem<'static>] = format_description!(
    "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second]"
);

pub trait Clock {
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local timezone, UTC when the local offset is unknown.
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Renders instants as `Mon Jan  2 15:04:05 MST 2006`.
pub struct Stamper {
    zone: Option<Zone>,
}

impl Stamper {
    pub fn new(zone: Option<Zone>) -> Stamper {
        Stamper { zone }
    }

    /// Stamper using the zone abbreviations of the local timezone database.
    pub fn local() -> Stamper {
        match Zone::load_local() {
            Ok(zone) => Stamper::new(Some(zone)),
            Err(e) => {
                debug!("stamp: no zone abbreviations: {:#}", e);
                Stamper::new(None)
            }
        }
    }

    pub fn format(&self, at: OffsetDateTime) -> Result<String, ClogError> {
        let date_time = at.format(DATE_TIME).map_err(|e| ClogError::Timestamp { source: e })?;
        Ok(format!("{} {} {:04}", date_time, self.zone_label(at.offset()), at.year()))
    }

    fn zone_label(&self, offset: UtcOffset) -> String {
        if let Some(abbrev) = self.zone.as_ref().and_then(|z| z.abbreviation(offset)) {
            return String::from(abbrev);
        }

        if offset.is_utc() {
            return String::from("UTC");
        }

        let (h, m, _) = offset.as_hms();
        let sign = if offset.is_negative() { '-' } else { '+' };
        format!("{}{:02}{:02}", sign, h.unsigned_abs(), m.unsigned_abs())
    }
}
