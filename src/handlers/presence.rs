//! RPL_ISON handling: update the presence table and notify on every flip.

use chrono::Local;
use tracing::{debug, error, info};

use crate::error::ProtocolError;
use crate::notify::{Envelope, Notification, Notifier};
use crate::proto::RawLine;
use crate::state::{PollResult, PresenceTable};

/// `:<server> 303 <me> :<nick> <nick> ...`
pub(super) fn parse_ison_reply(line: &RawLine<'_>) -> Result<PollResult, ProtocolError> {
    if line.len() < 4 {
        return Err(ProtocolError::MissingField {
            command: "RPL_ISON",
            expected: 4,
            actual: line.len(),
        });
    }
    let names = line.fields_from(3).join(" ");
    let names = names.strip_prefix(':').unwrap_or(&names);
    Ok(PollResult::new(names.split_whitespace()))
}

/// Apply one ISON reply. Notification failures are logged; the table keeps
/// the new state either way.
pub(super) async fn ison_reply(
    line: &RawLine<'_>,
    presence: &mut PresenceTable,
    notifier: &dyn Notifier,
    envelope: &Envelope,
) {
    let result = match parse_ison_reply(line) {
        Ok(result) => result,
        Err(e) => {
            debug!(error = %e, line = %line.text(), "Ignoring malformed presence reply");
            return;
        }
    };

    let transitions = presence.apply(&result);
    debug!(
        online = result.len(),
        tracked = presence.len(),
        changed = transitions.len(),
        "Presence poll applied"
    );

    for transition in transitions {
        info!(peer = %transition.peer, online = transition.online, "Presence changed");
        let notification = Notification::presence(&transition, envelope, Local::now().naive_local());
        if let Err(e) = notifier.send(&notification).await {
            error!(
                notifier = notifier.name(),
                peer = %transition.peer,
                error = %e,
                "Failed to send notification"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_variants() {
        let result = parse_ison_reply(&RawLine::new(":s 303 bot :alice bob")).unwrap();
        assert!(result.contains("alice") && result.contains("bob"));

        let result = parse_ison_reply(&RawLine::new(":s 303 bot :")).unwrap();
        assert_eq!(result.len(), 0);

        let result = parse_ison_reply(&RawLine::new(":s 303 bot alice")).unwrap();
        assert!(result.contains("alice"));
    }

    #[test]
    fn test_parse_short_reply_fails() {
        let err = parse_ison_reply(&RawLine::new(":s 303 bot")).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::MissingField {
                command: "RPL_ISON",
                expected: 4,
                actual: 3
            }
        );
    }
}
