//! crates/phishing_quiz_core/src/calendar.rs
//!
//! Data behind the admin month calendar: a six-week grid starting on Monday
//! and, for each day of the shown month, whether a quiz exists.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate};
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::ports::{AdminQuizService, PortResult};

pub const GRID_DAYS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    HasQuiz,
    NoQuiz,
}

/// A calendar month, anchored on its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// Parses `YYYY-MM`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.trim().split_once('-')?;
        Self::new(year.parse().ok()?, month.parse().ok()?)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.first.year() && date.month() == self.first.month()
    }

    /// Six full weeks, Monday first, covering the whole month.
    pub fn days(&self) -> Vec<CalendarDay> {
        let offset = u64::from(self.first.weekday().num_days_from_monday());
        let start = self.first - Days::new(offset);
        start
            .iter_days()
            .take(GRID_DAYS)
            .map(|date| CalendarDay {
                date,
                in_month: self.contains(date),
            })
            .collect()
    }

    pub fn dates_in_month(&self) -> Vec<NaiveDate> {
        self.days()
            .into_iter()
            .filter(|d| d.in_month)
            .map(|d| d.date)
            .collect()
    }
}

/// Month grid plus per-day quiz status and the selected day.
#[derive(Debug, Clone)]
pub struct CalendarView {
    month: CalendarMonth,
    selected: NaiveDate,
    statuses: BTreeMap<NaiveDate, DayStatus>,
}

impl CalendarView {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: CalendarMonth::containing(today),
            selected: today,
            statuses: BTreeMap::new(),
        }
    }

    pub fn month(&self) -> CalendarMonth {
        self.month
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn select(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    /// Switching months drops statuses until they are loaded again.
    pub fn show_month(&mut self, month: CalendarMonth) {
        self.month = month;
        self.statuses.clear();
    }

    pub fn status(&self, date: NaiveDate) -> DayStatus {
        self.statuses.get(&date).copied().unwrap_or(DayStatus::NoQuiz)
    }

    /// Asks the backend about each day of the month, one day at a time. A
    /// failed lookup counts as no quiz.
    pub async fn load_statuses(&mut self, service: &dyn AdminQuizService) {
        let month = self.month;
        let statuses: Vec<(NaiveDate, DayStatus)> = stream::iter(month.dates_in_month())
            .then(|date| async move {
                let status = match service.quiz_items_for(date).await {
                    Ok(Some(items)) if !items.is_empty() => DayStatus::HasQuiz,
                    Ok(_) => DayStatus::NoQuiz,
                    Err(e) => {
                        debug!(%date, "status lookup failed: {}", e);
                        DayStatus::NoQuiz
                    }
                };
                (date, status)
            })
            .collect()
            .await;
        self.statuses = statuses.into_iter().collect();
    }

    pub async fn delete_quiz(
        &mut self,
        service: &dyn AdminQuizService,
        date: NaiveDate,
    ) -> PortResult<()> {
        service.delete_quiz(date).await?;
        self.statuses.insert(date, DayStatus::NoQuiz);
        Ok(())
    }

    pub fn days(&self) -> Vec<(CalendarDay, Option<DayStatus>)> {
        self.month
            .days()
            .into_iter()
            .map(|day| {
                let status = day.in_month.then(|| self.status(day.date));
                (day, status)
            })
            .collect()
    }
}
