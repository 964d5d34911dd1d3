use super::domain::{RawInsightRecord, MESSAGING_CONVERSATION_STARTED_7D};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("lead action value '{value}' is not a non-negative integer")]
pub struct LeadCountError {
    pub value: String,
}

/// Lead count for a record: the value of the first messaging-conversation action, or 0.
pub fn extract_lead_count(record: &RawInsightRecord) -> Result<u64, LeadCountError> {
    match record
        .actions
        .iter()
        .find(|action| action.action_type == MESSAGING_CONVERSATION_STARTED_7D)
    {
        Some(action) => action
            .value
            .trim()
            .parse::<u64>()
            .map_err(|_| LeadCountError {
                value: action.value.clone(),
            }),
        None => Ok(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::domain::ActionValue;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(actions: &[(&str, &str)]) -> RawInsightRecord {
        RawInsightRecord {
            campaign_name: "Leads Now".to_string(),
            date_start: NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"),
            date_stop: None,
            spend: Decimal::new(100, 0),
            actions: actions
                .iter()
                .map(|(action_type, value)| ActionValue {
                    action_type: (*action_type).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn no_actions_means_zero_leads() {
        assert_eq!(extract_lead_count(&record(&[])), Ok(0));
    }

    #[test]
    fn ignores_other_action_types() {
        let row = record(&[
            ("link_click", "40"),
            ("onsite_conversion.messaging_conversation_started_1d", "3"),
        ]);
        assert_eq!(extract_lead_count(&row), Ok(0));
    }

    #[test]
    fn first_matching_action_wins() {
        let row = record(&[
            ("link_click", "40"),
            (MESSAGING_CONVERSATION_STARTED_7D, "4"),
            (MESSAGING_CONVERSATION_STARTED_7D, "9"),
        ]);
        assert_eq!(extract_lead_count(&row), Ok(4));
    }

    #[test]
    fn malformed_value_is_reported() {
        let row = record(&[(MESSAGING_CONVERSATION_STARTED_7D, "4.5")]);
        let err = extract_lead_count(&row).expect_err("not an integer");
        assert_eq!(err.value, "4.5");
    }
}
