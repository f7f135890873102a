use std::collections::HashSet;

/// Ordered, duplicate-free sequence of alert messages.
///
/// Identity is the exact message text. Insertion order is arrival order and
/// is preserved by every operation.
///
/// # Examples
///
/// ```
/// use coopwatch_alert::log::AlertLog;
///
/// let mut log = AlertLog::new();
/// let added = log.merge(vec!["a".to_string(), "b".to_string(), "a".to_string()]);
/// assert_eq!(added, vec!["a", "b"]);
/// assert!(log.merge(vec!["b".to_string()]).is_empty());
/// assert_eq!(log.remove("a"), 1);
/// assert_eq!(log.entries(), ["b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertLog {
    entries: Vec<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a log from possibly duplicated entries (first occurrence wins).
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self {
            entries: dedup(entries),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e == message)
    }

    /// Appends each message not already present, in the given order.
    /// Returns the messages that were actually added.
    pub fn merge<I>(&mut self, messages: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen: HashSet<String> = self.entries.iter().cloned().collect();
        let mut added = Vec::new();
        for message in messages {
            if seen.insert(message.clone()) {
                self.entries.push(message.clone());
                added.push(message);
            }
        }
        added
    }

    /// Removes every entry equal to `message`; returns how many were removed.
    pub fn remove(&mut self, message: &str) -> usize {
        let len_before = self.entries.len();
        self.entries.retain(|e| e != message);
        len_before - self.entries.len()
    }

    /// The last `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<String> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }
}

/// Stable dedup: keeps the first occurrence of each message, in order.
pub fn dedup(messages: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    messages
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}
