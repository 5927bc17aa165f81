/*!
 * Heuristic highlight detection over caption segments.
 *
 * Each segment gets an integer score from phrase matches and simple shape
 * features. Consecutive segments that score high enough are accumulated into
 * an open group; when a segment breaks the run the group is closed and, if
 * its span fits the requested duration bounds, emitted as a candidate.
 * Candidates are ranked by how many members matched a signal phrase.
 *
 * Output depends only on the segments, the bounds and the injected
 * `Lexicon`/`ScoringWeights`.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::app_config::HighlightConfig;
use crate::caption_parser::CaptionSegment;

/// Default maximum number of candidates returned by `detect`
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Phrase lists used to recognise engaging captions.
///
/// Phrases are matched as lower-case substrings of the lower-cased caption
/// text. Order is preserved and duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Engagement cues: calls to action, superlatives, warnings, how-to markers
    #[serde(default)]
    pub signal_phrases: Vec<String>,

    /// Explicit openers such as "let me show you"
    #[serde(default)]
    pub topic_openers: Vec<String>,
}

impl Lexicon {
    /// Build a lexicon from arbitrary phrase lists, normalising case
    pub fn new<S: AsRef<str>>(signal_phrases: &[S], topic_openers: &[S]) -> Self {
        Self {
            signal_phrases: normalize_phrases(signal_phrases),
            topic_openers: normalize_phrases(topic_openers),
        }
    }

    /// True when the lower-cased text contains any signal phrase
    pub fn has_signal(&self, lowered: &str) -> bool {
        contains_any(lowered, &self.signal_phrases)
    }

    /// True when the lower-cased text contains any topic opener
    pub fn has_topic_opener(&self, lowered: &str) -> bool {
        contains_any(lowered, &self.topic_openers)
    }
}

impl Default for Lexicon {
    /// Portuguese engagement cues, with unaccented spellings for auto-generated captions
    fn default() -> Self {
        Self::new(
            &[
                "incrível", "incrivel", "surpreendente", "você sabia", "voce sabia", "dica", "segredo",
                "nunca mais", "pare de", "como fazer", "tutorial", "passo a passo",
                "atenção", "atencao", "importante", "cuidado", "alerta", "não faça", "nao faca",
                "melhor", "pior", "top", "ranking", "lista",
                "mistério", "misterio", "revelação", "revelacao", "descoberta", "novidade",
                "truque", "hack", "macete", "jeito fácil", "jeito facil",
                "pergunta", "resposta", "explicação", "explicacao", "entenda",
                "motivação", "motivacao", "inspiração", "inspiracao", "sucesso", "conquista",
                "erro", "evite", "não cometa", "nao cometa", "cuidado com",
            ],
            &[
                "olha só", "olha so", "sabe o que", "quer saber", "vou te mostrar",
                "preste atenção", "preste atencao", "escuta isso", "imagina", "pensa comigo",
            ],
        )
    }
}

fn normalize_phrases<S: AsRef<str>>(phrases: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(phrases.len());
    for phrase in phrases {
        let lowered = phrase.as_ref().trim().to_lowercase();
        if !lowered.is_empty() && !normalized.contains(&lowered) {
            normalized.push(lowered);
        }
    }
    normalized
}

fn contains_any(lowered: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|phrase| lowered.contains(phrase.as_str()))
}

/// Points awarded per feature when scoring a single segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    #[serde(default = "default_signal_weight")]
    pub signal: u32,

    #[serde(default = "default_topic_opener_weight")]
    pub topic_opener: u32,

    /// Bonus for a question mark anywhere in the text
    #[serde(default = "default_bonus")]
    pub question: u32,

    /// Bonus when the text is longer than `long_text_chars`
    #[serde(default = "default_bonus")]
    pub long_text: u32,

    #[serde(default = "default_long_text_chars")]
    pub long_text_chars: usize,

    /// Bonus when the segment lasts longer than `long_duration_secs`
    #[serde(default = "default_bonus")]
    pub long_duration: u32,

    #[serde(default = "default_long_duration_secs")]
    pub long_duration_secs: f64,

    /// Minimum score for a segment to join the open group
    #[serde(default = "default_join_threshold")]
    pub join_threshold: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            signal: default_signal_weight(),
            topic_opener: default_topic_opener_weight(),
            question: default_bonus(),
            long_text: default_bonus(),
            long_text_chars: default_long_text_chars(),
            long_duration: default_bonus(),
            long_duration_secs: default_long_duration_secs(),
            join_threshold: default_join_threshold(),
        }
    }
}

fn default_signal_weight() -> u32 {
    2
}

fn default_topic_opener_weight() -> u32 {
    3
}

fn default_bonus() -> u32 {
    1
}

fn default_long_text_chars() -> usize {
    50
}

fn default_long_duration_secs() -> f64 {
    3.0
}

fn default_join_threshold() -> u32 {
    2
}

/// Score breakdown for one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentScore {
    pub score: u32,
    pub has_signal: bool,
    pub has_topic_opener: bool,
}

/// A time window flagged as a likely standalone highlight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightCandidate {
    pub start: f64,
    pub end: f64,
    pub duration: f64,
    /// Member caption texts joined with a space
    pub text: String,
    /// Number of member segments that matched a signal phrase
    pub score: u32,
}

// @struct: Members accumulated so far in the open group
#[derive(Debug)]
struct OpenGroup {
    start: f64,
    end: f64,
    texts: Vec<String>,
    signal_hits: u32,
}

// @enum: Grouping state machine
#[derive(Debug, Default)]
enum GroupState {
    #[default]
    Idle,
    Accumulating(OpenGroup),
}

impl GroupState {
    fn extend(&mut self, segment: &CaptionSegment, scored: SegmentScore) {
        let hit = u32::from(scored.has_signal);
        match self {
            GroupState::Idle => {
                *self = GroupState::Accumulating(OpenGroup {
                    start: segment.start,
                    end: segment.end,
                    texts: vec![segment.text.clone()],
                    signal_hits: hit,
                });
            }
            GroupState::Accumulating(group) => {
                group.end = segment.end;
                group.texts.push(segment.text.clone());
                group.signal_hits += hit;
            }
        }
    }

    /// Return to idle, yielding a candidate when the closed group fits the bounds
    fn close(&mut self, min_duration: f64, max_duration: f64) -> Option<HighlightCandidate> {
        let GroupState::Accumulating(group) = std::mem::take(self) else {
            return None;
        };

        let span = group.end - group.start;
        if span < min_duration || span > max_duration {
            debug!(
                "Discarding group at {:.2}s: span {:.2}s outside [{}, {}]",
                group.start, span, min_duration, max_duration
            );
            return None;
        }

        Some(HighlightCandidate {
            start: group.start,
            end: group.end,
            duration: span,
            text: group.texts.join(" "),
            score: group.signal_hits,
        })
    }
}

/// Ranks caption windows by the configured heuristic
#[derive(Debug, Clone)]
pub struct HighlightDetector {
    lexicon: Lexicon,
    weights: ScoringWeights,
    max_candidates: usize,
}

impl HighlightDetector {
    /// Create a detector returning at most `DEFAULT_MAX_CANDIDATES` results.
    ///
    /// The lexicon is normalised again since deserialized phrases keep their case.
    pub fn new(lexicon: Lexicon, weights: ScoringWeights) -> Self {
        Self {
            lexicon: Lexicon::new(&lexicon.signal_phrases, &lexicon.topic_openers),
            weights,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }

    /// Create a detector from the highlight section of the configuration
    pub fn from_config(config: &HighlightConfig) -> Self {
        Self::new(config.lexicon.clone(), config.weights.clone())
            .with_max_candidates(config.max_candidates)
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Score a single segment
    pub fn score_segment(&self, segment: &CaptionSegment) -> SegmentScore {
        let lowered = segment.text.to_lowercase();
        let has_signal = self.lexicon.has_signal(&lowered);
        let has_topic_opener = self.lexicon.has_topic_opener(&lowered);
        let weights = &self.weights;

        let mut score = 0;
        if has_signal {
            score += weights.signal;
        }
        if has_topic_opener {
            score += weights.topic_opener;
        }
        if segment.text.contains('?') {
            score += weights.question;
        }
        if segment.text.chars().count() > weights.long_text_chars {
            score += weights.long_text;
        }
        if segment.duration() > weights.long_duration_secs {
            score += weights.long_duration;
        }

        SegmentScore {
            score,
            has_signal,
            has_topic_opener,
        }
    }

    /// Find highlight windows whose span lies within `[min_duration, max_duration]`.
    ///
    /// Results are ordered by score, highest first; equal scores keep the
    /// order in which their groups closed. An empty result is a normal outcome.
    pub fn detect(
        &self,
        segments: &[CaptionSegment],
        min_duration: f64,
        max_duration: f64,
    ) -> Vec<HighlightCandidate> {
        let mut candidates = Vec::new();
        let mut state = GroupState::Idle;

        for segment in segments {
            let scored = self.score_segment(segment);

            if scored.score >= self.weights.join_threshold || scored.has_topic_opener {
                state.extend(segment, scored);
            } else if let Some(candidate) = state.close(min_duration, max_duration) {
                candidates.push(candidate);
            }
        }

        if let Some(candidate) = state.close(min_duration, max_duration) {
            candidates.push(candidate);
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(self.max_candidates);

        debug!(
            "Detected {} highlight candidate(s) from {} segment(s)",
            candidates.len(),
            segments.len()
        );

        candidates
    }
}

impl Default for HighlightDetector {
    fn default() -> Self {
        Self::new(Lexicon::default(), ScoringWeights::default())
    }
}
