use std::sync::Arc;

use report_protocol::ReportKind;

use crate::controller::{ControllerOptions, ReportController};
use crate::form::FormSpec;
use crate::transport::ReportTransport;

/// The four report forms, each with its own controller over a shared transport.
#[derive(Clone)]
pub struct ReportForms {
    github: ReportController,
    hn_topic: ReportController,
    hn_daily: ReportController,
    bidder_list: ReportController,
}

impl ReportForms {
    pub fn new(transport: Arc<dyn ReportTransport>, options: ControllerOptions) -> Self {
        let build = |kind: ReportKind| {
            ReportController::new(
                FormSpec::for_kind(kind),
                Arc::clone(&transport),
                options.clone(),
            )
        };
        Self {
            github: build(ReportKind::Github),
            hn_topic: build(ReportKind::HnTopic),
            hn_daily: build(ReportKind::HnDaily),
            bidder_list: build(ReportKind::BidderList),
        }
    }

    pub fn get(&self, kind: ReportKind) -> &ReportController {
        match kind {
            ReportKind::Github => &self.github,
            ReportKind::HnTopic => &self.hn_topic,
            ReportKind::HnDaily => &self.hn_daily,
            ReportKind::BidderList => &self.bidder_list,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReportKind, &ReportController)> {
        ReportKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}
