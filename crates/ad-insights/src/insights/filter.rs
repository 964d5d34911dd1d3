use crate::config::parse_terms;

/// Case-insensitive substring denylist applied to campaign names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignFilter {
    terms: Vec<String>,
}

impl CampaignFilter {
    pub fn new<I, T>(terms: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        Self { terms }
    }

    /// Parses a comma separated list such as `"vaga,vagas"`.
    pub fn from_csv(raw: &str) -> Self {
        Self::new(parse_terms(raw))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_excluded(&self, campaign_name: &str) -> bool {
        if self.terms.is_empty() {
            return false;
        }
        let name = campaign_name.to_lowercase();
        self.terms.iter().any(|term| name.contains(term.as_str()))
    }
}

impl Default for CampaignFilter {
    /// Recruiting campaigns ("vaga"/"vagas") do not generate sales leads.
    fn default() -> Self {
        Self::new(["vaga", "vagas"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_excludes_recruiting_campaigns_in_any_case() {
        let filter = CampaignFilter::default();
        assert!(filter.is_excluded("Vagas SP"));
        assert!(filter.is_excluded("CAMPANHA VAGA ABERTA"));
        assert!(filter.is_excluded("divulgacao-vaga"));
        assert!(!filter.is_excluded("Leads Now"));
        assert!(!filter.is_excluded(""));
    }

    #[test]
    fn custom_terms_are_normalized() {
        let filter = CampaignFilter::from_csv(" Recrutamento , ,TESTE");
        assert_eq!(filter.terms(), ["recrutamento", "teste"]);
        assert!(filter.is_excluded("Teste A/B"));
        assert!(!filter.is_excluded("Vagas SP"));
    }

    #[test]
    fn empty_denylist_excludes_nothing() {
        let filter = CampaignFilter::new(Vec::<String>::new());
        assert!(!filter.is_excluded("Vagas SP"));
    }
}
