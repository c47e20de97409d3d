//! The cache walkthrough: bind each URL, read it a few times, report timings

use std::io::Write;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use dlcache::{Fetch, SlotCache};
use tracing::debug;

/// How much to read and print per URL
#[derive(Debug, Clone, Copy)]
pub struct WalkOptions {
    /// Characters of content to print per read
    pub preview: usize,
    /// Reads per URL
    pub reads: usize,
}

/// What happened during a walk
#[derive(Debug, Default)]
pub struct WalkSummary {
    /// Successful reads
    pub reads: usize,
    /// URLs whose fetch failed
    pub failures: usize,
    /// URLs dropped to make room, in eviction order
    pub evicted: Vec<String>,
}

/// Timestamped walkthrough writer
pub struct Walk<W> {
    out: W,
    options: WalkOptions,
}

impl<W: Write> Walk<W> {
    pub fn new(out: W, options: WalkOptions) -> Self {
        Self { out, options }
    }

    /// Print `msg` prefixed with the local time
    pub fn stamp(&mut self, msg: &str) -> Result<()> {
        writeln!(
            self.out,
            "{} {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            msg
        )?;
        Ok(())
    }

    /// Bind every URL in turn and read it `reads` times.
    ///
    /// Fetch failures are reported and skipped; slot errors abort the walk.
    pub fn run<F: Fetch>(
        &mut self,
        cache: &mut SlotCache<F>,
        urls: &[String],
    ) -> Result<WalkSummary> {
        let mut summary = WalkSummary::default();

        for url in urls {
            let doomed = if cache.is_full() {
                cache
                    .eviction_candidate()
                    .and_then(|index| cache.entry(index))
                    .map(|entry| entry.url().to_string())
            } else {
                None
            };

            let slot = cache.next_free()?;
            if let Some(old) = doomed {
                self.stamp(&format!("Cache full, evicted {} from slot {}", old, slot))?;
                summary.evicted.push(old);
            }

            cache.set(slot, url.as_str())?;
            self.stamp(&format!(
                "Cached {} in slot {}, now let's read the first {} characters...",
                url, slot, self.options.preview
            ))?;

            for read in 1..=self.options.reads {
                let started = Instant::now();
                match cache.get(slot) {
                    Ok(content) => {
                        let shown = preview(content, self.options.preview);
                        writeln!(self.out, "{}", shown)?;
                        summary.reads += 1;
                    }
                    Err(e) => {
                        self.stamp(&format!("Could not read {}: {}", url, e))?;
                        summary.failures += 1;
                        break;
                    }
                }
                let elapsed = started.elapsed();
                debug!("Read {} of slot {} took {:?}", read, slot, elapsed);
                self.stamp(&format!("Read {} took {:?}", read, elapsed))?;
            }
        }

        match cache.eviction_candidate() {
            Some(index) => {
                if let Some(entry) = cache.entry(index) {
                    self.stamp(&format!(
                        "Next eviction would drop slot {} ({}, {} hits)",
                        index,
                        entry.url(),
                        entry.access_count()
                    ))?;
                }
            }
            None => self.stamp("Cache is empty, nothing to evict")?,
        }
        writeln!(self.out, "Stats: {}", cache.stats())?;

        Ok(summary)
    }
}

/// First `chars` characters of `content` on one line
fn preview(content: &str, chars: usize) -> String {
    content
        .chars()
        .take(chars)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
