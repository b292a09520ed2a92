//! Music prompt fusion: turns the current label, page context, and typed
//! cues into a generation prompt for adapters backed by generative audio.

use serde::Serialize;

use crate::adapters::PlayOptions;
use crate::context::{preview_text, Mood, PageContext, TextCues};
use crate::engine::state::Label;

const SNIPPET_PROMPT_LEN: usize = 220;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MusicPrompt {
    pub prompt: String,
    pub lyric_hook: String,
    pub instrumental: bool,
    pub duration_secs: u32,
}

fn label_texture(label: Label) -> &'static str {
    match label {
        Label::Focused => "steady low-beta pulses, soft analog pads, gentle shimmer highlights",
        Label::Neutral => "calm lofi beds, sparse keys, relaxed breathing pulses",
        Label::Distracted => "refocus pulse, minimal melody, warm plucks guiding attention back",
        Label::Idle => "weightless ambient layers, long pads, soft exhale swells",
    }
}

fn context_hint(host: &str, snippet_lower: &str) -> &'static str {
    if host.contains("github") {
        "coding dark ui with subtle futuristic edges"
    } else if host.contains("notion") {
        "minimal writing workspace with clarity and space"
    } else if host.contains("metorial") {
        "ai memory platform with confident forward motion"
    } else if host.contains("ycombinator") {
        "startup inspiration hub with maker energy"
    } else if snippet_lower.contains("documentation") {
        "documentation session, detail-friendly atmosphere"
    } else {
        "general productivity flow in a premium workspace"
    }
}

fn lyric_hook(host: &str) -> &'static str {
    if host.contains("ycombinator") {
        "make something people want"
    } else if host.contains("metorial") {
        "Metorial mode on, building memory that matters"
    } else {
        ""
    }
}

fn cue_line(label: Label, cues: Option<&TextCues>) -> String {
    let mut parts: Vec<&str> = Vec::new();

    if let Some(cues) = cues {
        if matches!(cues.sleep_hours, Some(h) if h <= 3) {
            parts.push("urgent energizing drum grooves, crisp percussion accents, motivational lift");
        }
        match cues.mood {
            Some(Mood::Tired) => {
                parts.push("bright support energy, friendly momentum, subtle major swells")
            }
            Some(Mood::Happy) => {
                parts.push("joyful but focus-safe motifs, sparkling chords, light bounce")
            }
            None => {}
        }
    }

    if label == Label::Distracted {
        parts.push("gently steering attention with minimal repeating motifs and calm bass pulses");
    }
    if label == Label::Focused && parts.is_empty() {
        parts.push("locked-in focus cadence, no lyrical distractions, tight rhythmic bed");
    }

    parts.join("; ")
}

pub fn fuse_prompt(
    label: Label,
    page: Option<&PageContext>,
    cues: Option<&TextCues>,
    options: &PlayOptions,
) -> MusicPrompt {
    let host = page.map(|p| p.host.to_lowercase()).unwrap_or_default();
    let title = page.map(|p| p.title.as_str()).unwrap_or_default();
    let snippet_lower = page.map(|p| p.snippet.to_lowercase()).unwrap_or_default();
    let snippet = page
        .map(|p| preview_text(&p.snippet, SNIPPET_PROMPT_LEN))
        .unwrap_or_default();

    let base = format!(
        "Create loopable {label} background music with {}.",
        label_texture(label)
    );
    let subject = if !title.is_empty() {
        title
    } else if !host.is_empty() {
        &host
    } else {
        "current task"
    };
    let scene = format!(
        "Scene: {}. Title or tab: \"{subject}\".",
        context_hint(&host, &snippet_lower)
    );
    let snippet_line = if snippet.is_empty() {
        String::new()
    } else {
        format!("Key on-screen phrases: \"{snippet}\".")
    };
    let cue_line = cue_line(label, cues);

    let prompt = [base, scene, snippet_line, cue_line]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let hook = lyric_hook(&host);
    let use_lyrics = !hook.is_empty() && options.allow_lyric && !options.instrumental_only;

    MusicPrompt {
        prompt,
        lyric_hook: if use_lyrics { hook.to_string() } else { String::new() },
        instrumental: options.instrumental_only || !use_lyrics,
        duration_secs: options.duration_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn options(instrumental_only: bool, allow_lyric: bool) -> PlayOptions {
        PlayOptions {
            instrumental_only,
            allow_lyric,
            duration_secs: 30,
        }
    }

    fn page(host: &str) -> PageContext {
        PageContext {
            host: host.into(),
            title: "Some Tab".into(),
            snippet: "reading the documentation".into(),
        }
    }

    #[test]
    fn prompt_carries_the_label_texture() {
        let prompt = fuse_prompt(Label::Focused, None, None, &options(true, true));
        assert!(prompt.prompt.contains("loopable focused background music"));
        assert!(prompt.prompt.contains("low-beta pulses"));
    }

    #[test]
    fn known_hosts_pick_their_scene_hint() {
        let prompt = fuse_prompt(Label::Neutral, Some(&page("github.com")), None, &options(true, true));
        assert!(prompt.prompt.contains("coding dark ui"));

        let generic = fuse_prompt(Label::Neutral, None, None, &options(true, true));
        assert!(generic.prompt.contains("general productivity flow"));
    }

    #[test]
    fn lyric_hook_is_gated_by_instrumental_setting() {
        let yc = page("news.ycombinator.com");

        let instrumental = fuse_prompt(Label::Neutral, Some(&yc), None, &options(true, true));
        assert_eq!(instrumental.lyric_hook, "");
        assert!(instrumental.instrumental);

        let lyrical = fuse_prompt(Label::Neutral, Some(&yc), None, &options(false, true));
        assert_eq!(lyrical.lyric_hook, "make something people want");
        assert!(!lyrical.instrumental);

        let disallowed = fuse_prompt(Label::Neutral, Some(&yc), None, &options(false, false));
        assert_eq!(disallowed.lyric_hook, "");
        assert!(disallowed.instrumental);
    }

    #[test]
    fn low_sleep_cue_adds_energizing_direction() {
        let cues = TextCues {
            sleep_hours: Some(3),
            mood: Some(Mood::Tired),
        };
        let prompt = fuse_prompt(Label::Neutral, None, Some(&cues), &options(true, true));
        assert!(prompt.prompt.contains("energizing drum grooves"));
        assert!(prompt.prompt.contains("bright support energy"));
    }

    #[test]
    fn distracted_prompt_steers_attention_back() {
        let prompt = fuse_prompt(Label::Distracted, None, None, &options(true, true));
        assert!(prompt.prompt.contains("gently steering attention"));
    }
}
