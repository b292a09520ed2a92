//! Keyword matching for spoken commands. Transcripts are short and
//! noisy, so matching is ordered substring checks on the lowercased
//! text, most specific first.

/// A recognized spoken command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceCommand {
    /// Silence announcements and coaching.
    Mute,
    Pause,
    Resume,
    Refocus,
    Focus,
    Calm,
    /// Clear any manual override.
    Auto,
}

/// Map a transcript to a command, or `None` when nothing matches.
pub fn parse_command(transcript: &str) -> Option<VoiceCommand> {
    let text = transcript.to_lowercase();

    let mentions_voice =
        text.contains("voice") || text.contains("coach") || text.contains("assistant");
    if (text.contains("mute") || text.contains("silence")) && mentions_voice {
        return Some(VoiceCommand::Mute);
    }
    if text.contains("pause") || text.contains("stop") || text.contains("hold") {
        return Some(VoiceCommand::Pause);
    }
    if text.contains("resume") || text.contains("continue") || text.contains("play") {
        return Some(VoiceCommand::Resume);
    }
    // "refocus" contains "focus", so it must be checked first.
    if text.contains("refocus") {
        return Some(VoiceCommand::Refocus);
    }
    if text.contains("focus") {
        return Some(VoiceCommand::Focus);
    }
    if text.contains("calm") || text.contains("ambient") {
        return Some(VoiceCommand::Calm);
    }
    if text.contains("auto") {
        return Some(VoiceCommand::Auto);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transcripts_map_to_commands() {
        let cases = [
            ("mute the voice please", Some(VoiceCommand::Mute)),
            ("silence the coach", Some(VoiceCommand::Mute)),
            ("pause the music", Some(VoiceCommand::Pause)),
            ("hold on a second", Some(VoiceCommand::Pause)),
            ("resume playback", Some(VoiceCommand::Resume)),
            ("play something", Some(VoiceCommand::Resume)),
            ("help me refocus", Some(VoiceCommand::Refocus)),
            ("focus mode", Some(VoiceCommand::Focus)),
            ("something calm", Some(VoiceCommand::Calm)),
            ("ambient please", Some(VoiceCommand::Calm)),
            ("back to auto", Some(VoiceCommand::Auto)),
            ("what's the weather", None),
        ];
        for (transcript, expected) in cases {
            assert_eq!(parse_command(transcript), expected, "{transcript}");
        }
    }

    #[test]
    fn mute_requires_a_voice_target() {
        // "mute" alone is ambiguous between voice and music.
        assert_eq!(parse_command("mute"), None);
        assert_eq!(parse_command("mute the assistant"), Some(VoiceCommand::Mute));
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(parse_command("PAUSE NOW"), Some(VoiceCommand::Pause));
        assert_eq!(parse_command("Refocus Me"), Some(VoiceCommand::Refocus));
    }
}
