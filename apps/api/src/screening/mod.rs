pub mod extractor;
pub mod handlers;
pub mod heuristic;
pub mod ingest;
pub mod job_profile;
pub mod llm_scorer;
pub mod matcher;
pub mod normalizer;
pub mod prompts;
pub mod recovery;
pub mod run;
pub mod scorer;
pub mod shortlist;
pub mod skills;

#[cfg(test)]
pub mod testing;
