//! Generative-AI procurement analysis.
//!
//! The model service is an opaque collaborator behind a typed
//! request/response contract. Every failure is recoverable: analysis falls
//! back to a deterministic locally computed summary, scouting and drafting
//! fall back to an explanatory text. No AI failure ever blocks the rest of
//! the dashboard.

use crate::entities::{Category, Item, Supplier};
use crate::errors::ServiceError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use strum::Display;
use tracing::{instrument, warn};

const ANALYST_PERSONA: &str = "You are an expert AI procurement analyst for a manufacturer of \
waste compactor vehicles. Analyze inventory and supplier data to surface savings \
opportunities, risks, and performance KPIs.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Up,
    Down,
    Neutral,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    pub trend: KpiTrend,
}

/// Structured analysis of the current procurement position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub summary: String,
    pub kpis: Vec<Kpi>,
    pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoutingSource {
    pub title: String,
    pub uri: String,
}

/// Web-grounded supplier scouting result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoutingReport {
    pub analysis_text: String,
    pub sources: Vec<ScoutingSource>,
}

/// What to scout alternatives or competitors for.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoutingTarget {
    Item {
        name: String,
        category: Category,
        cost: Decimal,
        current_supplier: String,
    },
    Supplier {
        name: String,
        rating: f32,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementKind {
    Rfi,
    Nda,
    Rfq,
}

// Wire types for the generateContent endpoint.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    uri: Option<String>,
}

impl GenerateContentResponse {
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let joined: String = parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if joined.is_empty() {
            None
        } else {
            Some(joined)
        }
    }

    fn sources(&self) -> Vec<ScoutingSource> {
        let chunks = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.as_slice())
            .unwrap_or_default();

        let mut sources = Vec::new();
        for chunk in chunks {
            let Some(web) = &chunk.web else { continue };
            let Some(uri) = web.uri.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            // Deduplicate by URI, keeping the first title seen.
            if sources.iter().any(|s: &ScoutingSource| s.uri == uri) {
                continue;
            }
            sources.push(ScoutingSource {
                title: web
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "Web source".to_string()),
                uri: uri.to_string(),
            });
        }
        sources
    }
}

pub struct AnalysisService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    text_model: String,
    reasoning_model: String,
}

impl AnalysisService {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        text_model: impl Into<String>,
        reasoning_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            text_model: text_model.into(),
            reasoning_model: reasoning_model.into(),
        })
    }

    /// Structured analysis of the inventory and supplier base. Falls back to
    /// a locally computed summary whenever the collaborator fails.
    #[instrument(skip_all, fields(items = items.len(), suppliers = suppliers.len()))]
    pub async fn analyze(&self, items: &[Item], suppliers: &[Supplier]) -> AiAnalysis {
        match self.analyze_remote(items, suppliers).await {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(error = %err, "AI analysis failed; serving local summary");
                local_summary(items, suppliers)
            }
        }
    }

    async fn analyze_remote(
        &self,
        items: &[Item],
        suppliers: &[Supplier],
    ) -> Result<AiAnalysis, ServiceError> {
        let data_context = json!({
            "inventory_summary": items.iter().map(|i| json!({
                "sku": i.sku, "name": i.name, "stock": i.stock,
                "cost": i.cost, "supplier": i.supplier_id,
            })).collect::<Vec<_>>(),
            "supplier_summary": suppliers.iter().map(|s| json!({
                "id": s.id, "name": s.name, "rating": s.rating,
            })).collect::<Vec<_>>(),
        });

        let prompt = format!(
            "Analyze the following JSON describing our current inventory and supplier list.\n\
             1. Compute the total value of the inventory on hand.\n\
             2. Identify the main supplier by number of linked items.\n\
             3. Flag risks driven by low stock levels (assume safety-stock logic).\n\
             4. Return a structured answer with a summary, 3 distinct KPIs and operational recommendations.\n\n\
             Data: {}",
            data_context
        );

        let body = json!({
            "systemInstruction": { "parts": [{ "text": ANALYST_PERSONA }] },
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "kpis": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "label": { "type": "STRING" },
                                    "value": { "type": "STRING" },
                                    "trend": { "type": "STRING", "enum": ["up", "down", "neutral"] }
                                }
                            }
                        },
                        "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            }
        });

        let response = self.generate(&self.text_model, body).await?;
        let text = response
            .text()
            .ok_or_else(|| ServiceError::AiGeneration("empty model response".into()))?;
        serde_json::from_str(&text)
            .map_err(|e| ServiceError::AiGeneration(format!("unparseable analysis: {}", e)))
    }

    /// Web-grounded scouting for alternative suppliers or direct competitors.
    #[instrument(skip_all)]
    pub async fn scout(&self, target: &ScoutingTarget) -> ScoutingReport {
        match self.scout_remote(target).await {
            Ok(report) => report,
            Err(err) => {
                warn!(error = %err, "supplier scouting failed");
                ScoutingReport {
                    analysis_text: "Web scouting is unavailable right now. Check the \
                                    connection or the AI API key, then retry."
                        .to_string(),
                    sources: vec![],
                }
            }
        }
    }

    async fn scout_remote(&self, target: &ScoutingTarget) -> Result<ScoutingReport, ServiceError> {
        let prompt = match target {
            ScoutingTarget::Item {
                name,
                category,
                cost,
                current_supplier,
            } => format!(
                "I am looking for alternative suppliers for this item:\n\
                 - Product: {} ({})\n\
                 - Current supplier: {}\n\
                 - Current cost: EUR {}\n\n\
                 Use web search to find 2-3 real, reliable manufacturers or distributors \
                 (preferably in Europe/Italy) selling similar products. For each candidate \
                 explain the rationale, compare it with the current supplier where possible, \
                 and include a link to its website. Format the answer as clear Markdown.",
                name, category, current_supplier, cost
            ),
            ScoutingTarget::Supplier { name, rating } => format!(
                "I am looking for direct competitors of the following supplier:\n\
                 - Target company: {}\n\
                 - Sector: industrial supplies / metalworking\n\
                 - Internal rating: {}/5\n\n\
                 Use web search to find 2-3 competing companies active in the same market \
                 (Italy/Europe). For each competitor analyze its strengths against {}, \
                 assess its online reputation where available, and link its website. \
                 Format the answer as clear Markdown.",
                name, rating, name
            ),
        };

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "googleSearch": {} }]
        });

        let response = self.generate(&self.reasoning_model, body).await?;
        Ok(ScoutingReport {
            analysis_text: response
                .text()
                .unwrap_or_else(|| "No results found.".to_string()),
            sources: response.sources(),
        })
    }

    /// Drafts an RFI/NDA/RFQ towards a scouted candidate.
    #[instrument(skip_all, fields(kind = %kind))]
    pub async fn engagement_draft(
        &self,
        kind: EngagementKind,
        candidate: &str,
        item_name: &str,
        company: &str,
    ) -> String {
        let prompt = match kind {
            EngagementKind::Rfi => format!(
                "Write a formal Request For Information (RFI) email addressed to \"{}\". \
                 We are \"{}\" and we are interested in their product \"{}\" for our compactor \
                 production. Ask about production capacity, ISO certifications and standard \
                 lead times. Professional but direct tone.",
                candidate, company, item_name
            ),
            EngagementKind::Nda => format!(
                "Draft a short standard non-disclosure agreement between \"{}\" and \"{}\". \
                 Subject: exchange of technical information for the supply of \"{}\". Include \
                 standard clauses on a 2-year term and generic penalties.",
                company, candidate, item_name
            ),
            EngagementKind::Rfq => format!(
                "Write a Request For Quotation (RFQ) email for \"{}\". We request a quote for \
                 1000 units of \"{}\". Ask about volume discounts, payment terms and Incoterms.",
                candidate, item_name
            ),
        };

        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        match self.generate(&self.text_model, body).await {
            Ok(response) => response
                .text()
                .unwrap_or_else(|| "Content generation returned no text.".to_string()),
            Err(err) => {
                warn!(error = %err, "engagement draft failed");
                "Text generation is unavailable right now.".to_string()
            }
        }
    }

    async fn generate(
        &self,
        model: &str,
        body: serde_json::Value,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ServiceError::AiGeneration("no AI API key configured".into()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, model
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::AiGeneration(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::AiGeneration(format!(
                "status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::AiGeneration(e.to_string()))
    }
}

/// Deterministic degraded-mode summary built from the data already on hand.
fn local_summary(items: &[Item], suppliers: &[Supplier]) -> AiAnalysis {
    AiAnalysis {
        summary: "AI service unavailable; showing locally computed figures.".to_string(),
        kpis: vec![
            Kpi {
                label: "Total items".to_string(),
                value: items.len().to_string(),
                trend: KpiTrend::Neutral,
            },
            Kpi {
                label: "Active suppliers".to_string(),
                value: suppliers.len().to_string(),
                trend: KpiTrend::Neutral,
            },
        ],
        recommendations: vec![
            "Check inventory records manually".to_string(),
            "Verify the AI API key configuration".to_string(),
        ],
    }
}
