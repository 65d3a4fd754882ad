use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Category of a classified log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// System/status event (joins, parts, mode changes, ...)
    Status,
    /// Ordinary chat message with a speaker
    Normal,
    /// Third-person action ("/me")
    Me,
    /// Anything the grammar does not recognize
    Other,
}

/// One classified line of log text.
///
/// Every variant retains the original text; structured fields are only
/// extracted where the line shape provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogLine {
    Status {
        time: String,
        message: String,
        raw: String,
    },
    Normal {
        time: String,
        nick: String,
        message: String,
        raw: String,
    },
    Me {
        time: String,
        nick: String,
        message: String,
        raw: String,
    },
    Other {
        raw: String,
    },
}

impl LogLine {
    pub fn kind(&self) -> LineKind {
        match self {
            LogLine::Status { .. } => LineKind::Status,
            LogLine::Normal { .. } => LineKind::Normal,
            LogLine::Me { .. } => LineKind::Me,
            LogLine::Other { .. } => LineKind::Other,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            LogLine::Status { raw, .. }
            | LogLine::Normal { raw, .. }
            | LogLine::Me { raw, .. }
            | LogLine::Other { raw } => raw,
        }
    }

    pub fn time(&self) -> Option<&str> {
        match self {
            LogLine::Status { time, .. }
            | LogLine::Normal { time, .. }
            | LogLine::Me { time, .. } => Some(time),
            LogLine::Other { .. } => None,
        }
    }

    /// The speaker or actor, where the line shape names one.
    pub fn nick(&self) -> Option<&str> {
        match self {
            LogLine::Normal { nick, .. } | LogLine::Me { nick, .. } => Some(nick),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LogLine::Status { message, .. }
            | LogLine::Normal { message, .. }
            | LogLine::Me { message, .. } => Some(message),
            LogLine::Other { .. } => None,
        }
    }
}

/// Shape classifier for raw log lines.
///
/// Rules are tried in order (status, action, normal); anything unrecognized
/// degrades to [`LogLine::Other`], so classification never fails and every
/// physical line yields exactly one record. Log formats drift across client
/// versions, which is why a strict grammar is deliberately not enforced.
#[derive(Debug, Clone)]
pub struct Classifier {
    status: Regex,
    me: Regex,
    normal: Regex,
}

// Every recognized shape starts with an HH:MM timestamp, seconds optional.
const TIME: &str = r"\d{1,2}:\d{2}(?::\d{2})?";

impl Classifier {
    pub fn new() -> Self {
        Self {
            status: Regex::new(&format!(r"^({TIME}) -!- (.*)$")).unwrap(),
            me: Regex::new(&format!(r"^({TIME}) \* (\S+) ?(.*)$")).unwrap(),
            normal: Regex::new(&format!(r"^({TIME}) [<\[]([^>\]]+)[>\]] ?(.*)$")).unwrap(),
        }
    }

    /// Returns the process-wide classifier instance.
    pub(crate) fn shared() -> &'static Classifier {
        static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
        CLASSIFIER.get_or_init(Classifier::new)
    }

    /// Classifies one raw line into a [`LogLine`], first match wins.
    pub fn classify(&self, raw: &str) -> LogLine {
        if let Some(c) = self.status.captures(raw) {
            return LogLine::Status {
                time: c[1].to_string(),
                message: c[2].to_string(),
                raw: raw.to_string(),
            };
        }

        if let Some(c) = self.me.captures(raw) {
            return LogLine::Me {
                time: c[1].to_string(),
                nick: c[2].to_string(),
                message: c[3].to_string(),
                raw: raw.to_string(),
            };
        }

        if let Some(c) = self.normal.captures(raw) {
            return LogLine::Normal {
                time: c[1].to_string(),
                nick: c[2].to_string(),
                message: c[3].to_string(),
                raw: raw.to_string(),
            };
        }

        LogLine::Other {
            raw: raw.to_string(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_the_three_known_shapes() {
        let classifier = Classifier::new();
        let lines = [
            "01:47 -!- K-Yo [K-Yo@RZ-853d8549.example.fr] has joined #teamrezo",
            "01:47 <ciblout> kage: demain matin, quand tu veux",
            "01:48 * ciblout mange une pomme",
        ];

        let kinds: Vec<_> = lines
            .iter()
            .map(|line| classifier.classify(line).kind())
            .collect();
        assert_eq!(kinds, vec![LineKind::Status, LineKind::Normal, LineKind::Me]);
    }

    #[test]
    fn extracts_speaker_and_body() {
        let classifier = Classifier::new();

        let normal = classifier.classify("01:47 <ciblout> kage: demain matin");
        assert_eq!(normal.time(), Some("01:47"));
        assert_eq!(normal.nick(), Some("ciblout"));
        assert_eq!(normal.message(), Some("kage: demain matin"));

        let me = classifier.classify("01:48 * ciblout mange une pomme");
        assert_eq!(me.nick(), Some("ciblout"));
        assert_eq!(me.message(), Some("mange une pomme"));

        let status = classifier.classify("01:47 -!- X has joined #chan");
        assert_eq!(status.nick(), None);
        assert_eq!(status.message(), Some("X has joined #chan"));
    }

    #[test]
    fn bracketed_speakers_are_normal() {
        let line = Classifier::new().classify("12:00 [deploybot] release finished");
        assert_eq!(line.kind(), LineKind::Normal);
        assert_eq!(line.nick(), Some("deploybot"));
    }

    #[test]
    fn seconds_in_timestamps_are_accepted() {
        let line = Classifier::new().classify("01:47:12 <x> hi");
        assert_eq!(line.kind(), LineKind::Normal);
        assert_eq!(line.time(), Some("01:47:12"));
    }

    #[test]
    fn unrecognized_lines_fall_back_to_other() {
        let classifier = Classifier::new();
        for raw in ["--- Day changed Sat Apr 10 2010", "", "no timestamp here"] {
            let line = classifier.classify(raw);
            assert_eq!(line.kind(), LineKind::Other);
            assert_eq!(line.raw(), raw);
        }
    }

    #[test]
    fn serializes_with_a_type_tag() {
        let classifier = Classifier::new();

        let normal = serde_json::to_value(classifier.classify("01:47 <y> hi")).unwrap();
        assert_eq!(normal["type"], "normal");
        assert_eq!(normal["nick"], "y");
        assert_eq!(normal["message"], "hi");

        let other = serde_json::to_value(classifier.classify("garbage")).unwrap();
        assert_eq!(other["type"], "other");
        assert_eq!(other["raw"], "garbage");
    }
}
