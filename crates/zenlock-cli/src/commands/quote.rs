use zenlock_core::{quotes, Config};

pub fn run_quote(minutes: u64) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_or_default();
    let provider = quotes::provider_from_environment(&cfg);
    let rt = tokio::runtime::Runtime::new()?;
    let quote = rt.block_on(provider.quote(&format!("{minutes} minute session")));
    println!("{quote}");
    Ok(())
}

pub fn run_tips() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load_or_default();
    let provider = quotes::provider_from_environment(&cfg);
    let rt = tokio::runtime::Runtime::new()?;
    let tips = rt.block_on(provider.tips());
    for (i, tip) in tips.iter().enumerate() {
        println!("{}. {tip}", i + 1);
    }
    Ok(())
}
