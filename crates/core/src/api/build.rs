use crate::api::http::JsonHttp;
use crate::api::{BuildApi, VcAvailability};
use crate::config::Settings;
use crate::domain::schedule::{MeetingConfirmation, ScheduleForm};
use crate::domain::vc::VentureCapitalist;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct HttpBuildClient {
    http: JsonHttp,
}

impl HttpBuildClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(&settings.build_api_url, settings)
    }

    pub fn new(base_url: &str, settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            http: JsonHttp::new(base_url, settings.http_timeout)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    venture_capitalists: Vec<VentureCapitalist>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    venture_capitalist: VentureCapitalist,
}

#[derive(Debug, Deserialize)]
struct ScheduleResponse {
    meeting_details: MeetingConfirmation,
}

#[derive(Debug, Serialize)]
struct ResearchRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResearchResponse {
    result: String,
}

#[async_trait::async_trait]
impl BuildApi for HttpBuildClient {
    async fn list_vcs(&self) -> anyhow::Result<Vec<VentureCapitalist>> {
        let res: ListResponse = self.http.get("/connect_vc").await?;
        Ok(res.venture_capitalists)
    }

    async fn get_vc(&self, id: u64) -> anyhow::Result<VentureCapitalist> {
        let res: DetailResponse = self.http.get(&format!("/connect_vc/{id}")).await?;
        Ok(res.venture_capitalist)
    }

    async fn availability(&self, id: u64) -> anyhow::Result<VcAvailability> {
        self.http
            .get(&format!("/connect_vc/{id}/availability"))
            .await
    }

    async fn schedule_meeting(
        &self,
        id: u64,
        form: &ScheduleForm,
    ) -> anyhow::Result<MeetingConfirmation> {
        let res: ScheduleResponse = self
            .http
            .post(&format!("/connect_vc/{id}/schedule"), form)
            .await?;
        Ok(res.meeting_details)
    }

    async fn market_research(&self, input: &str) -> anyhow::Result<String> {
        let res: ResearchResponse = self
            .http
            .post("/market_research", &ResearchRequest { input })
            .await?;
        Ok(res.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::{kind_of, ApiErrorKind};
    use crate::domain::schedule::flatten_available_slots;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> HttpBuildClient {
        let settings = Settings {
            api_url: None,
            build_api_url: server.uri(),
            http_timeout: Duration::from_secs(5),
            carousel_interval: Duration::from_secs(5),
            sentry_dsn: None,
        };
        HttpBuildClient::from_settings(&settings).unwrap()
    }

    #[tokio::test]
    async fn detail_keeps_schedule_key_order() {
        let server = MockServer::start().await;
        let body = r#"{
            "status": "success",
            "venture_capitalist": {
                "id": 7, "name": "Asha Rao", "company": "Blume", "photo": "", "experience": "12 years",
                "domain": ["Fintech"], "bio": "",
                "schedule": {
                    "2025-03-12": {"15:00": true, "10:00": true},
                    "2025-03-10": {"09:00": true, "11:00": false}
                }
            }
        }"#;
        Mock::given(method("GET"))
            .and(path("/connect_vc/7"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.as_bytes(), "application/json"),
            )
            .mount(&server)
            .await;

        let vc = client(&server).await.get_vc(7).await.unwrap();
        let slots: Vec<(String, String)> = flatten_available_slots(&vc.schedule)
            .into_iter()
            .map(|s| (s.date, s.time))
            .collect();
        assert_eq!(
            slots,
            vec![
                ("2025-03-12".to_string(), "15:00".to_string()),
                ("2025-03-12".to_string(), "10:00".to_string()),
                ("2025-03-10".to_string(), "09:00".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn unknown_vc_is_http_404() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connect_vc/99"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "VC not found"})))
            .mount(&server)
            .await;

        let err = client(&server).await.get_vc(99).await.unwrap_err();
        assert_eq!(kind_of(&err), Some(ApiErrorKind::HttpStatus(404)));
    }

    #[tokio::test]
    async fn schedule_posts_form_and_returns_confirmation() {
        let server = MockServer::start().await;
        let form = ScheduleForm {
            date: "2025-03-12".to_string(),
            time_slot: "10:00".to_string(),
            startup_name: "Chai Labs".to_string(),
            founder_name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            pitch_summary: "Tea logistics".to_string(),
        };
        Mock::given(method("POST"))
            .and(path("/connect_vc/7/schedule"))
            .and(body_json(&form))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "message": "Meeting scheduled successfully",
                "meeting_details": {
                    "meeting_id": "MTG_7_20250312_1000",
                    "vc_name": "Asha Rao",
                    "date": "2025-03-12",
                    "time_slot": "10:00",
                    "startup_name": "Chai Labs",
                    "founder_name": "Ravi",
                    "email": "ravi@example.com",
                    "pitch_summary": "Tea logistics"
                }
            })))
            .mount(&server)
            .await;

        let confirmation = client(&server).await.schedule_meeting(7, &form).await.unwrap();
        assert_eq!(confirmation.meeting_id, "MTG_7_20250312_1000");
    }

    #[tokio::test]
    async fn listing_without_success_marker_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/connect_vc"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"venture_capitalists": []})),
            )
            .mount(&server)
            .await;

        let err = client(&server).await.list_vcs().await.unwrap_err();
        assert_eq!(kind_of(&err), Some(ApiErrorKind::NotSuccess));
    }

    #[tokio::test]
    async fn market_research_returns_raw_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/market_research"))
            .and(body_json(json!({"input": "tea delivery"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "type": "market_research",
                "result": "[]",
                "input": "tea delivery"
            })))
            .mount(&server)
            .await;

        let result = client(&server).await.market_research("tea delivery").await.unwrap();
        assert_eq!(result, "[]");
    }
}
