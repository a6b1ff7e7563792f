use crate::{Event, RecurrenceResult, Series, Window};
use chrono::{NaiveDate, NaiveTime};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Clone, Debug)]
enum Entry {
    Series(Series),
    Single(Event),
}

/// Series and one-off events merged into one chronological stream.
#[derive(Clone, Debug, Default)]
pub struct Agenda {
    entries: Vec<Entry>,
}

impl Agenda {
    pub fn new() -> Self {
        Agenda::default()
    }

    pub fn series(mut self, series: Series) -> Self {
        self.entries.push(Entry::Series(series));
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.entries.push(Entry::Single(event));
        self
    }

    /// Every event visible in `window`, ordered by date then start time.
    ///
    /// All-day events come first on their day; otherwise equal events keep
    /// the order their sources were added in.
    pub fn events(&self, window: Window) -> RecurrenceResult<impl Iterator<Item = Event>> {
        let mut sources: Vec<Box<dyn Iterator<Item = Event>>> = Vec::new();
        for entry in &self.entries {
            match entry {
                Entry::Series(series) => sources.push(Box::new(series.occurrences(window)?)),
                Entry::Single(event) if window.contains(event.date) => {
                    sources.push(Box::new(std::iter::once(event.clone())))
                }
                Entry::Single(_) => {}
            }
        }

        tracing::debug!(sources = sources.len(), "merging agenda");

        let mut min_heap: BinaryHeap<_> = sources
            .into_iter()
            .enumerate()
            .filter_map(|(source, mut iter)| {
                iter.next()
                    .map(|event| Reverse(Cursor::new(source, event, iter)))
            })
            .collect();

        Ok(std::iter::from_fn(move || {
            let Reverse(Cursor {
                source,
                event,
                mut iter,
                ..
            }) = min_heap.pop()?;

            if let Some(next) = iter.next() {
                min_heap.push(Reverse(Cursor::new(source, next, iter)));
            }

            Some(event)
        }))
    }
}

/// Holds a source and the earliest event that came out of it.
struct Cursor {
    key: (NaiveDate, Option<NaiveTime>, usize),
    source: usize,
    event: Event,
    iter: Box<dyn Iterator<Item = Event>>,
}

impl Cursor {
    fn new(source: usize, event: Event, iter: Box<dyn Iterator<Item = Event>>) -> Self {
        Cursor {
            key: (event.date, event.time, source),
            source,
            event,
            iter,
        }
    }
}

impl Eq for Cursor {}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.key.eq(&other.key)
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}
