use crate::models::SearchCriteria;

/// Outbound trigger for the external automation platform. One call per
/// search submission, fire-and-forget: failures are logged, never retried,
/// and never block the submission flow.
pub struct AutomationHook {
    http: reqwest::Client,
    url: Option<String>,
}

impl AutomationHook {
    pub fn new(url: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub async fn trigger(&self, criteria: &SearchCriteria) {
        let Some(url) = &self.url else {
            // No endpoint configured: record the payload and move on.
            log::info!(
                "automation webhook not configured; search criteria: {:?}",
                criteria
            );
            return;
        };

        match self.http.post(url).json(criteria).send().await {
            Ok(response) if response.status().is_success() => {
                log::info!("automation webhook accepted search for {:?}", criteria.keywords);
            }
            Ok(response) => {
                log::error!("automation webhook returned {}", response.status());
            }
            Err(err) => {
                log::error!("automation webhook call failed: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_hook_completes_without_a_request() {
        let hook = AutomationHook::new(None);
        let criteria = SearchCriteria {
            keywords: "pricing, churn".into(),
            subreddit: "SaaS".into(),
            business_description: "retention tooling".into(),
        };
        tokio_test::block_on(hook.trigger(&criteria));
        assert!(hook.endpoint().is_none());
    }
}
