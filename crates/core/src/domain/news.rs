use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: u32,
    pub title: String,
    pub summary: String,
    pub category: String,
    pub time: String,
    pub source: String,
}

/// Static headline feed shown on the build page.
pub fn default_feed() -> Vec<NewsItem> {
    [
        (
            1,
            "Indian Startup Funding Reaches $8.2B in Q3 2025",
            "Venture capital investments in Indian startups show strong growth, with fintech and AI companies leading the charge.",
            "Funding",
            "2 hours ago",
            "TechCrunch India",
        ),
        (
            2,
            "AI-Powered Healthcare Startups See 40% Growth",
            "Healthcare technology companies leveraging artificial intelligence are attracting significant investor attention.",
            "HealthTech",
            "4 hours ago",
            "YourStory",
        ),
        (
            3,
            "Sequoia Capital India Launches $2.8B Fund",
            "Major venture capital firm announces new fund focusing on early-stage Indian startups across multiple sectors.",
            "VC News",
            "6 hours ago",
            "Economic Times",
        ),
        (
            4,
            "EdTech Market Expected to Reach $30B by 2027",
            "Educational technology sector shows promising growth trajectory with increased adoption of digital learning.",
            "EdTech",
            "8 hours ago",
            "Inc42",
        ),
    ]
    .into_iter()
    .map(|(id, title, summary, category, time, source)| NewsItem {
        id,
        title: title.to_string(),
        summary: summary.to_string(),
        category: category.to_string(),
        time: time.to_string(),
        source: source.to_string(),
    })
    .collect()
}
