use opensearch_operator::registry::CrdRegistry;

fn main() -> anyhow::Result<()> {
    let registry = CrdRegistry::with_defaults();
    print!("{}", registry.to_yaml()?);
    Ok(())
}
