use mapshell::VERSION;

mod activation;
mod harness;
mod recovery;

#[test]
fn scenarios_binary_smoke_runs() {
    assert!(!VERSION.is_empty());
}
