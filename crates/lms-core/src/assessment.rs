//! Assessment questions, recorded attempts, and per-module scoring.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::time::now_timestamp;
use crate::{ResultId, TraineeId};

/// Score shown for a module that has attempts but no graded ones.
pub const PENDING_SCORE: &str = "Pending";

/// Media link stored when an attempt was submitted without that media.
pub const SKIPPED_MEDIA: &str = "Skipped";

/// A question belonging to an assessment module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Module identifier, usually a number as text.
    pub module_id: String,
    /// Name of the curriculum group the module belongs to.
    pub module_name: String,
    /// The question prompt.
    pub question_text: String,
}

impl Question {
    /// Create a question.
    #[must_use]
    pub fn new(
        module_id: impl Into<String>,
        module_name: impl Into<String>,
        question_text: impl Into<String>,
    ) -> Self {
        Self {
            module_id: module_id.into(),
            module_name: module_name.into(),
            question_text: question_text.into(),
        }
    }
}

/// Prompt used when a module has no questions on file.
#[must_use]
pub fn default_question(module: &str) -> String {
    format!("Default Question for Module {module}")
}

/// One recorded attempt at a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// The result ID.
    pub result_id: ResultId,
    /// The trainee who made the attempt.
    pub trainee_id: TraineeId,
    /// Trainee name at submission time.
    pub trainee_name: String,
    /// Module number as submitted.
    pub module_number: String,
    /// Link to the video recording, or [`SKIPPED_MEDIA`].
    pub video_link: String,
    /// Link to the audio recording, or [`SKIPPED_MEDIA`].
    pub audio_link: String,
    /// Attempt number for this trainee and module.
    pub attempt_count: String,
    /// Score given by a trainer; empty until graded.
    pub score: String,
    /// When the attempt was submitted.
    pub timestamp: String,
}

impl AssessmentResult {
    /// Create an ungraded attempt with a fresh ID.
    #[must_use]
    pub fn submitted(
        trainee_id: TraineeId,
        trainee_name: impl Into<String>,
        module_number: impl Into<String>,
        attempt: usize,
        video_link: impl Into<String>,
        audio_link: impl Into<String>,
    ) -> Self {
        Self {
            result_id: ResultId::generate(),
            trainee_id,
            trainee_name: trainee_name.into(),
            module_number: module_number.into(),
            video_link: video_link.into(),
            audio_link: audio_link.into(),
            attempt_count: attempt.to_string(),
            score: String::new(),
            timestamp: now_timestamp(),
        }
    }

    /// Whether the attempt is still waiting for a grade.
    #[must_use]
    pub fn is_pending_review(&self) -> bool {
        self.score.is_empty()
    }

    /// The attempt number, if the stored value is numeric.
    #[must_use]
    pub fn attempt_number(&self) -> Option<u64> {
        self.attempt_count.trim().parse().ok()
    }
}

/// Score summary for one module of one trainee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleScore {
    /// Module number.
    pub module: String,
    /// Mean of graded scores with one decimal place, or [`PENDING_SCORE`].
    pub score: String,
    /// Number of submitted attempts, graded or not.
    pub attempts: usize,
}

#[derive(Default)]
struct ScoreTally {
    sum: f64,
    graded: u32,
    attempts: usize,
}

/// Summarize a trainee's attempts per module, in first-seen module order.
///
/// Empty scores count as attempts but not as grades. Scores that do not
/// parse as numbers are skipped from the mean.
pub fn module_scores<'a, I>(results: I) -> Vec<ModuleScore>
where
    I: IntoIterator<Item = &'a AssessmentResult>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, ScoreTally> = HashMap::new();

    for result in results {
        let module = result.module_number.as_str();
        let tally = tallies.entry(module).or_insert_with(|| {
            order.push(module);
            ScoreTally::default()
        });
        tally.attempts += 1;
        if result.score.is_empty() {
            continue;
        }
        if let Ok(value) = result.score.trim().parse::<f64>() {
            if value.is_finite() {
                tally.sum += value;
                tally.graded += 1;
            }
        }
    }

    order
        .into_iter()
        .map(|module| {
            let tally = &tallies[module];
            let score = if tally.graded > 0 {
                format!("{:.1}", tally.sum / f64::from(tally.graded))
            } else {
                PENDING_SCORE.to_string()
            };
            ModuleScore {
                module: module.to_string(),
                score,
                attempts: tally.attempts,
            }
        })
        .collect()
}

/// A named group of modules in the curriculum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumGroup {
    /// Group (module) name.
    pub name: String,
    /// Distinct module IDs, ordered by [`compare_module_ids`].
    pub modules: Vec<String>,
}

/// Group questions by module name and list each group's distinct module IDs.
///
/// Groups keep the order in which their names first appear.
pub fn curriculum<'a, I>(questions: I) -> Vec<CurriculumGroup>
where
    I: IntoIterator<Item = &'a Question>,
{
    let mut groups: Vec<(&str, BTreeSet<&str>)> = Vec::new();
    for question in questions {
        let name = question.module_name.as_str();
        match groups.iter_mut().find(|(group, _)| *group == name) {
            Some((_, ids)) => {
                ids.insert(question.module_id.as_str());
            }
            None => groups.push((name, BTreeSet::from([question.module_id.as_str()]))),
        }
    }

    groups
        .into_iter()
        .map(|(name, ids)| {
            let mut modules: Vec<String> = ids.into_iter().map(str::to_string).collect();
            modules.sort_by(|a, b| compare_module_ids(a, b));
            CurriculumGroup {
                name: name.to_string(),
                modules,
            }
        })
        .collect()
}

/// Order module IDs: numeric IDs by integer value, then the rest lexicographically.
///
/// Numeric means non-empty and all ASCII digits. Values are compared
/// exactly, without overflow, by ignoring leading zeros and comparing
/// digit count first. IDs with equal value fall back to string order.
#[must_use]
pub fn compare_module_ids(a: &str, b: &str) -> Ordering {
    match (is_numeric_id(a), is_numeric_id(b)) {
        (true, true) => {
            let (ta, tb) = (a.trim_start_matches('0'), b.trim_start_matches('0'));
            ta.len()
                .cmp(&tb.len())
                .then_with(|| ta.cmp(tb))
                .then_with(|| a.cmp(b))
        }
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.cmp(b),
    }
}

fn is_numeric_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt(module: &str, score: &str) -> AssessmentResult {
        let mut result = AssessmentResult::submitted(
            TraineeId::from("TRN-1"),
            "Ravi",
            module,
            1,
            SKIPPED_MEDIA,
            SKIPPED_MEDIA,
        );
        result.score = score.to_string();
        result
    }

    #[test]
    fn graded_mean_with_one_ungraded_attempt() {
        let results = vec![
            attempt("1", "70"),
            attempt("1", "80"),
            attempt("1", "90"),
            attempt("1", ""),
        ];
        let scores = module_scores(&results);
        assert_eq!(
            scores,
            vec![ModuleScore {
                module: "1".into(),
                score: "80.0".into(),
                attempts: 4,
            }]
        );
    }

    #[test]
    fn ungraded_module_is_pending() {
        let results = vec![attempt("2", ""), attempt("2", "")];
        let scores = module_scores(&results);
        assert_eq!(scores[0].score, PENDING_SCORE);
        assert_eq!(scores[0].attempts, 2);
    }

    #[test]
    fn unparseable_scores_are_skipped() {
        let results = vec![attempt("3", "abc"), attempt("3", "60"), attempt("4", "n/a")];
        let scores = module_scores(&results);
        assert_eq!(scores[0].score, "60.0");
        assert_eq!(scores[0].attempts, 2);
        assert_eq!(scores[1].score, PENDING_SCORE);
        assert_eq!(scores[1].attempts, 1);
    }

    #[test]
    fn modules_keep_first_seen_order() {
        let results = vec![attempt("5", "1"), attempt("2", "2"), attempt("5", "3")];
        let modules: Vec<_> = module_scores(&results)
            .into_iter()
            .map(|m| m.module)
            .collect();
        assert_eq!(modules, vec!["5", "2"]);
    }

    #[test]
    fn mean_keeps_one_decimal() {
        let results = vec![attempt("1", "85"), attempt("1", "86")];
        assert_eq!(module_scores(&results)[0].score, "85.5");

        let results = vec![attempt("1", "90"), attempt("1", "95"), attempt("1", "96")];
        assert_eq!(module_scores(&results)[0].score, "93.7");
    }

    #[test]
    fn module_id_ordering() {
        let mut ids = vec!["10", "2", "1", "A"];
        ids.sort_by(|a, b| compare_module_ids(a, b));
        assert_eq!(ids, vec!["1", "2", "10", "A"]);

        let mut ids = vec!["B", "a", "007", "99999999999999999999999", "3"];
        ids.sort_by(|a, b| compare_module_ids(a, b));
        assert_eq!(ids, vec!["3", "007", "99999999999999999999999", "B", "a"]);
    }

    #[test]
    fn curriculum_groups_by_name() {
        let questions = vec![
            Question::new("10", "Basics", "q1"),
            Question::new("2", "Basics", "q2"),
            Question::new("2", "Basics", "q3"),
            Question::new("A", "Advanced", "q4"),
            Question::new("1", "Basics", "q5"),
        ];
        let groups = curriculum(&questions);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Basics");
        assert_eq!(groups[0].modules, vec!["1", "2", "10"]);
        assert_eq!(groups[1].name, "Advanced");
        assert_eq!(groups[1].modules, vec!["A"]);
    }

    #[test]
    fn default_question_names_module() {
        assert_eq!(default_question("7"), "Default Question for Module 7");
    }
}
