use futures::stream::{self, StreamExt, TryStreamExt};
use gemba_core::{CoreError, ParsedAnswer, Segment};
use gemba_metrics::{lookup, ProtocolDefinition, Stage};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::RequestConfig;
use crate::error::Result;
use crate::request::{AnswerRecord, AnswerRequester, RequestOptions};

/// Outcome for one segment, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentScore {
    pub index: usize,
    /// First validated answer of the final stage.
    pub answer: Option<ParsedAnswer>,
    /// Annotated spans produced by an earlier stage, if the protocol has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_spans: Option<String>,
    pub records: Vec<AnswerRecord>,
}

/// Scores segments under one protocol.
pub struct Scorer {
    requester: AnswerRequester,
    protocol: &'static ProtocolDefinition,
}

impl Scorer {
    /// Fails with [`CoreError::UnsupportedProtocol`] for an unknown name.
    pub fn new(requester: AnswerRequester, protocol: &str) -> Result<Self> {
        Ok(Self {
            requester,
            protocol: lookup(protocol)?,
        })
    }

    pub fn protocol(&self) -> &'static ProtocolDefinition {
        self.protocol
    }

    pub async fn score_segments(&self, segments: &[Segment]) -> Result<Vec<SegmentScore>> {
        info!(
            protocol = self.protocol.name(),
            segments = segments.len(),
            model = %self.requester.config().model,
            "Scoring segments"
        );

        let scores: Vec<SegmentScore> = stream::iter(segments.iter().enumerate())
            .map(|(index, segment)| self.score_segment(index, segment))
            .buffered(self.requester.config().concurrency.max(1))
            .try_collect()
            .await?;

        let scored = scores.iter().filter(|s| s.answer.is_some()).count();
        info!(
            protocol = self.protocol.name(),
            scored,
            unscored = scores.len() - scored,
            "Finished scoring"
        );
        Ok(scores)
    }

    pub async fn score_segment(&self, index: usize, segment: &Segment) -> Result<SegmentScore> {
        let (final_stage, earlier) = self.protocol.stages.split_last().ok_or_else(|| {
            CoreError::Validation(format!("Protocol {} has no stages", self.protocol.name()))
        })?;

        let mut segment = segment.clone();
        let mut error_spans = None;

        for (stage_index, stage) in earlier.iter().enumerate() {
            let records = self.run_stage(stage_index, stage, &segment).await?;
            let spans = records
                .first()
                .and_then(|record| record.answer.as_ref())
                .and_then(ParsedAnswer::as_text)
                .map(str::to_string);

            match spans {
                Some(spans) => {
                    segment.error_spans = Some(spans.clone());
                    error_spans = Some(spans);
                }
                None => {
                    warn!(index, "No error spans returned, skipping ranking stage");
                    return Ok(SegmentScore {
                        index,
                        answer: None,
                        error_spans: None,
                        records,
                    });
                }
            }
        }

        let records = self
            .run_stage(earlier.len(), final_stage, &segment)
            .await?;
        Ok(SegmentScore {
            index,
            answer: records.first().and_then(|record| record.answer.clone()),
            error_spans,
            records,
        })
    }

    async fn run_stage(
        &self,
        stage_index: usize,
        stage: &Stage,
        segment: &Segment,
    ) -> Result<Vec<AnswerRecord>> {
        let config = self.requester.config();
        let prompt = stage.template.render(&segment.to_context())?;
        let validator = stage.validator.listing_errors(config.list_mqm_errors);
        let options = stage_options(self.protocol, stage_index, config);
        self.requester.request(&prompt, &validator, options).await
    }
}

/// Request options for one stage of a protocol.
///
/// `max_tokens` is the stage hint, falling back to the configured default
/// for single-stage protocols only. A response format is only requested
/// for the final stage. Panics if `stage_index` is out of range.
pub fn stage_options(
    protocol: &ProtocolDefinition,
    stage_index: usize,
    config: &RequestConfig,
) -> RequestOptions {
    let stage = &protocol.stages[stage_index];
    let max_tokens = if protocol.stages.len() == 1 {
        stage.max_answer_tokens.or(config.default_max_tokens)
    } else {
        stage.max_answer_tokens
    };
    let is_final = stage_index + 1 == protocol.stages.len();

    RequestOptions {
        max_tokens,
        response_format: if is_final {
            protocol.response_format(config.use_structured_output)
        } else {
            None
        },
    }
}
