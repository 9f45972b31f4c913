/// User-facing copy for dismissible error modals
use genai::GenError;

pub(crate) fn daily_refresh_failed() -> Vec<String> {
    vec![
        "Failed to generate daily videos.".to_string(),
        "Please check your API key and try again later.".to_string(),
    ]
}

/// Copy for a failed user-initiated create or remix. Denied API calls
/// get the billing hint, transport failures a connection hint, anything
/// else the generic retry line.
pub(crate) fn generation_failed(err: &GenError) -> Vec<String> {
    match err {
        GenError::Api {
            status: 400 | 401 | 403,
            ..
        } => vec![
            "Veo is only available on the Paid Tier.".to_string(),
            "Please select your Cloud Project to get started.".to_string(),
        ],
        GenError::Transfer(_) | GenError::Http(_) => vec![
            "The video could not be downloaded.".to_string(),
            "Check your connection and try again.".to_string(),
        ],
        _ => vec![
            "Video generation did not complete.".to_string(),
            "Please try again in a few minutes.".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_api_calls_get_the_billing_hint() {
        let err = GenError::Api {
            status: 403,
            message: "caller does not have permission".to_string(),
        };
        assert_eq!(generation_failed(&err)[0], "Veo is only available on the Paid Tier.");
    }

    #[test]
    fn test_transfer_failures_get_the_connection_hint() {
        let err = GenError::transfer("download failed with status 502");
        assert_eq!(generation_failed(&err)[0], "The video could not be downloaded.");
    }

    #[test]
    fn test_other_failures_get_the_generic_line() {
        let err = GenError::JobFailed("safety filters".to_string());
        assert_eq!(generation_failed(&err)[0], "Video generation did not complete.");
    }
}
