//! Prompt and response schema sent to the provider.

use serde_json::{json, Value};

/// Build the user prompt for one company query.
///
/// `grounded` requests use live search and cannot carry a response schema,
/// so the prompt spells out the JSON shape instead.
pub fn analysis_prompt(query: &str, grounded: bool) -> String {
    let mut prompt = format!(
        r#"Act as a market intelligence analyst. Research public opinion about the company "{query}".
Look at reviews, forum threads and social media posts (Reddit, G2, Trustpilot, Twitter/X, app stores, news).

Produce a sentiment report with:
- companyName: the company's name
- websiteUrl: the official website, if known
- overallScore: an integer from 0 (very negative) to 100 (very positive)
- sentimentDistribution: percentages of positive, neutral and negative feedback that sum to 100
- summary: two or three sentences on the overall perception
- pros: up to 5 things people praise
- cons: up to 5 things people criticize
- topics: 4 to 6 themes, each with a sentimentScore (0-100, above 60 positive, below 40 negative), a volume from 1 to 10 for how often it comes up, and a one-sentence summary
- reviews: 4 to 8 representative snippets, each with the platform, the url if known, the snippet text, a sentiment of exactly "Positive", "Neutral" or "Negative", and the date if known"#
    );

    if grounded {
        prompt.push_str(
            r#"

Return ONLY a valid JSON object (no markdown, no explanation) with this structure:
{
  "companyName": "string",
  "websiteUrl": "string",
  "overallScore": 0,
  "sentimentDistribution": {"positive": 0, "neutral": 0, "negative": 0},
  "summary": "string",
  "pros": ["string"],
  "cons": ["string"],
  "topics": [{"topic": "string", "sentimentScore": 0, "volume": 1, "summary": "string"}],
  "reviews": [{"platform": "string", "url": "string", "snippet": "string", "sentiment": "Positive", "date": "string"}]
}"#,
        );
    }

    prompt
}

/// Response schema in the provider's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "companyName": {"type": "STRING"},
            "websiteUrl": {"type": "STRING"},
            "overallScore": {"type": "INTEGER", "description": "0 to 100"},
            "sentimentDistribution": {
                "type": "OBJECT",
                "properties": {
                    "positive": {"type": "NUMBER"},
                    "neutral": {"type": "NUMBER"},
                    "negative": {"type": "NUMBER"}
                },
                "required": ["positive", "neutral", "negative"]
            },
            "summary": {"type": "STRING"},
            "pros": {"type": "ARRAY", "items": {"type": "STRING"}},
            "cons": {"type": "ARRAY", "items": {"type": "STRING"}},
            "topics": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "topic": {"type": "STRING"},
                        "sentimentScore": {"type": "NUMBER", "description": "0 to 100"},
                        "volume": {"type": "NUMBER", "description": "1 to 10"},
                        "summary": {"type": "STRING"}
                    },
                    "required": ["topic", "sentimentScore", "volume", "summary"]
                }
            },
            "reviews": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "platform": {"type": "STRING"},
                        "url": {"type": "STRING"},
                        "snippet": {"type": "STRING"},
                        "sentiment": {"type": "STRING", "enum": ["Positive", "Neutral", "Negative"]},
                        "date": {"type": "STRING"}
                    },
                    "required": ["platform", "snippet", "sentiment"]
                }
            }
        },
        "required": [
            "companyName",
            "overallScore",
            "sentimentDistribution",
            "summary",
            "pros",
            "cons",
            "topics",
            "reviews"
        ]
    })
}
