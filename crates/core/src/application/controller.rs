// Controller - runs the pipeline, then the action, and returns a typed outcome
//
// Rendering is left to whatever front end drives the controller.

use crate::application::pipeline::{Action, Pipeline, Request, RequestContext};
use crate::application::QueueControlClient;
use crate::domain::{ItemId, RateLimit};
use crate::error::Result;
use std::sync::Arc;
use tracing::info;

/// What the action produced, on top of the loaded context
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Landing page
    Index { ascii_art: String },
    /// Full queue page
    Queue,
    /// Queue partial re-rendered after a dequeue
    QueueItems { dequeued: ItemId },
    /// Bandwidth page; `updated` is set when a new cap was posted
    Bandwidth { updated: Option<RateLimit> },
    Redirect { location: String },
    /// Bookmarklet install page
    Bookmarklet { link: String },
}

#[derive(Debug, Clone)]
pub struct Handled {
    pub context: RequestContext,
    pub response: Response,
}

pub struct Controller {
    client: Arc<QueueControlClient>,
    pipeline: Pipeline,
}

impl Controller {
    pub fn new(client: Arc<QueueControlClient>, pipeline: Pipeline) -> Self {
        Self { client, pipeline }
    }

    pub fn client(&self) -> &QueueControlClient {
        &self.client
    }

    pub async fn handle(&self, action: Action, request: &Request) -> Result<Handled> {
        let mut ctx = self.pipeline.run(action, request, &self.client).await?;

        let response = match action {
            Action::Index => Response::Index {
                ascii_art: self.client.ascii_art().await?,
            },
            Action::Queue => Response::Queue,
            Action::Dequeue => {
                let composite = request.require_param("id")?;
                let dequeued = self.client.dequeue_composite(composite).await?;
                ctx.queue = Some(self.client.list_queue().await?);
                Response::QueueItems { dequeued }
            }
            Action::Bandwidth => {
                let updated = if request.is_post() {
                    let field = request.require_param("maxrate")?;
                    let rate = self.client.set_max_rate_from_form(field).await?;
                    ctx.status = Some(self.client.refresh_status().await?);
                    Some(rate)
                } else {
                    None
                };
                Response::Bandwidth { updated }
            }
            Action::EnqueueBookmarklet => {
                let url = request.require_param("url")?;
                let id = self.client.enqueue_from_url(url).await?;
                info!(item_id = %id, "Bookmarklet enqueue accepted");
                Response::Redirect {
                    location: url.to_string(),
                }
            }
            Action::Bookmarklet => Response::Bookmarklet {
                link: ctx.view.base_url.clone(),
            },
        };

        Ok(Handled {
            context: ctx,
            response,
        })
    }
}
