use crate::config::MatchConfig;
use crate::screening::scorer::MatchResult;

/// Threshold filter, descending order, top-N cut.
#[derive(Debug, Clone)]
pub struct ShortlistAssembler {
    minimum_score: f64,
    max_size: usize,
}

impl ShortlistAssembler {
    pub fn new(config: &MatchConfig) -> Self {
        Self {
            minimum_score: config.minimum_score_threshold,
            max_size: config.shortlist_size,
        }
    }

    /// Equal scores keep their input order; callers pass results in resume
    /// submission order.
    pub fn assemble(&self, results: Vec<MatchResult>) -> Vec<MatchResult> {
        let mut kept: Vec<MatchResult> = results
            .into_iter()
            .filter(|r| r.score >= self.minimum_score)
            .collect();
        // `sort_by` is stable.
        kept.sort_by(|a, b| b.score.total_cmp(&a.score));
        kept.truncate(self.max_size);
        kept
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::screening::scorer::ModelUsed;

    fn result(score: f64) -> MatchResult {
        MatchResult {
            resume_id: Uuid::new_v4(),
            job_id: Uuid::nil(),
            score,
            reasoning: vec!["r".to_string()],
            model_used: ModelUsed::Heuristic,
        }
    }

    fn assembler(threshold: f64, size: usize) -> ShortlistAssembler {
        ShortlistAssembler::new(&MatchConfig {
            minimum_score_threshold: threshold,
            shortlist_size: size,
            ..MatchConfig::default()
        })
    }

    #[test]
    fn test_filters_sorts_and_truncates() {
        let input: Vec<MatchResult> = [6.9, 9.1, 7.0, 8.4, 10.0].into_iter().map(result).collect();
        let shortlist = assembler(7.0, 3).assemble(input);
        let scores: Vec<f64> = shortlist.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![10.0, 9.1, 8.4]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let shortlist = assembler(7.0, 5).assemble(vec![result(7.0), result(6.99)]);
        assert_eq!(shortlist.len(), 1);
        assert_eq!(shortlist[0].score, 7.0);
    }

    #[test]
    fn test_ties_keep_submission_order() {
        let input = vec![result(8.0), result(9.0), result(8.0), result(8.0)];
        let tied: Vec<Uuid> = [0, 2, 3].iter().map(|&i| input[i].resume_id).collect();
        let shortlist = assembler(7.0, 3).assemble(input);

        assert_eq!(shortlist[0].score, 9.0);
        let got: Vec<Uuid> = shortlist[1..].iter().map(|r| r.resume_id).collect();
        assert_eq!(got, tied[..2].to_vec());
    }

    #[test]
    fn test_nothing_clears_threshold() {
        let shortlist = assembler(7.0, 5).assemble(vec![result(3.0), result(6.5)]);
        assert!(shortlist.is_empty());
    }

    #[test]
    fn test_fewer_than_size_returns_all_qualifying() {
        let shortlist = assembler(0.0, 10).assemble(vec![result(1.0), result(0.0)]);
        assert_eq!(shortlist.len(), 2);
    }
}
