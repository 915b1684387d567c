//! Review summaries for the answer-generation prompt
//!
//! `analyze_reviews` runs every retrieved passage through the multilingual
//! analyzer once; the formatting functions are pure over the report.

use crate::aspect::detect_question_aspect;
use crate::multilingual::MultilingualAnalyzer;
use crate::types::SentimentLabel;
use serde::{Deserialize, Serialize};

/// Display order of labels in summaries
const SUMMARY_ORDER: [SentimentLabel; 3] = [
    SentimentLabel::Positive,
    SentimentLabel::Neutral,
    SentimentLabel::Negative,
];

/// Review passage handed over by the retrieval collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPassage {
    pub text: String,
    /// Star rating (1-5), when the source has one
    #[serde(default)]
    pub rating: Option<f32>,
}

impl ReviewPassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f32) -> Self {
        self.rating = Some(rating);
        self
    }
}

/// Sentiment of one passage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewInsight {
    pub text: String,
    pub rating: Option<f32>,
    pub overall: SentimentLabel,
    /// Aspect verdict, present only when the passage mentions the aspect
    pub aspect: Option<SentimentLabel>,
}

/// Per-passage insights for one question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewReport {
    /// Aspect detected from the question
    pub aspect: Option<String>,
    pub insights: Vec<ReviewInsight>,
}

/// Analyze every passage, and its aspect when the question names one
pub async fn analyze_reviews(
    analyzer: &MultilingualAnalyzer,
    reviews: &[ReviewPassage],
    question: &str,
) -> ReviewReport {
    let aspect = detect_question_aspect(question);
    let mut insights = Vec::with_capacity(reviews.len());

    for review in reviews {
        let (overall, aspect_label) = match aspect {
            Some(aspect) => {
                let (overall, scoped) = analyzer
                    .analyze_overall_and_aspect(&review.text, aspect)
                    .await;
                (
                    overall.label(),
                    scoped.result.aspect_mentioned.then(|| scoped.label()),
                )
            }
            None => (analyzer.analyze_sentiment(&review.text).await.label(), None),
        };

        insights.push(ReviewInsight {
            text: review.text.clone(),
            rating: review.rating,
            overall,
            aspect: aspect_label,
        });
    }

    ReviewReport {
        aspect: aspect.map(str::to_string),
        insights,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One `Customer feedback: ...` line per passage, separated by blank lines
pub fn format_reviews_with_sentiment(report: &ReviewReport) -> String {
    let aspect_name = report.aspect.as_deref().map(capitalize);

    report
        .insights
        .iter()
        .map(|insight| {
            let rating = insight
                .rating
                .map(|r| format!(" (Rating: {}/5)", r))
                .unwrap_or_default();
            let aspect = match (&aspect_name, insight.aspect) {
                (Some(name), Some(label)) => format!(" - {} sentiment: {}", name, label),
                _ => String::new(),
            };
            format!(
                "Customer feedback: \"{}\"{} - Overall sentiment: {}{}",
                insight.text, rating, insight.overall, aspect
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Label distribution across passages, plus the aspect breakdown
pub fn sentiment_distribution(report: &ReviewReport) -> String {
    let total = report.insights.len();
    let mut lines = vec![format!("Total reviews analyzed: {}", total)];

    for label in SUMMARY_ORDER {
        let count = report.insights.iter().filter(|i| i.overall == label).count();
        lines.push(format!(
            "{}: {} reviews ({:.1}%)",
            label,
            count,
            percentage(count, total)
        ));
    }

    if let Some(aspect) = &report.aspect {
        let mentions: Vec<SentimentLabel> =
            report.insights.iter().filter_map(|i| i.aspect).collect();
        if !mentions.is_empty() {
            lines.push(format!(
                "\n{}-specific mentions: {} reviews",
                capitalize(aspect),
                mentions.len()
            ));
            for label in SUMMARY_ORDER {
                let count = mentions.iter().filter(|l| **l == label).count();
                if count > 0 {
                    lines.push(format!(
                        "  {}: {} ({:.1}%)",
                        label,
                        count,
                        percentage(count, mentions.len())
                    ));
                }
            }
        }
    }

    lines.join("\n")
}
