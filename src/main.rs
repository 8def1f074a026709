// ============================================================================
//  LANSMAN PLANLAYICI v1.0
//  Uniswap V4 Hook + Asset Token Deterministik Deploy Planı
//
//  ✓ CREATE2 salt madenciliği (hook bayrakları + token sıralaması)
//  ✓ Spacing'e hizalı tek taraflı / dengeli likidite aralıkları
//  ✓ Canlı doluluk kontrolü (eth_getCode) ve slot0 okuma
//  ✓ plot_slugs.py uyumlu slug raporu
// ============================================================================

use lansman_planlayici::hook_flags;
use lansman_planlayici::math;
use lansman_planlayici::planner::{self, LaunchPlan};
use lansman_planlayici::types::PlannerConfig;

use chrono::Local;
use colored::*;
use eyre::{Result, WrapErr};

// ─────────────────────────────────────────────────────────────────────────────
// Terminal Çıktı Yardımcıları
// ─────────────────────────────────────────────────────────────────────────────

fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

fn print_banner(config: &PlannerConfig) {
    println!();
    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════════╗"
            .cyan().bold()
    );
    println!(
        "{}",
        "║       LANSMAN PLANLAYICI v1.0                                    ║"
            .cyan().bold()
    );
    println!(
        "{}",
        "║    Hook + Token CREATE2 Madenciliği / Likidite Aralıkları        ║"
            .cyan().bold()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════════╝"
            .cyan().bold()
    );
    println!();
    println!("  {} Hook Deployer  : {}", "▸".cyan(), format!("{}", config.hook_deployer).white());
    println!("  {} Token Deployer : {}", "▸".cyan(), format!("{}", config.token_deployer).white());
    println!("  {} Numeraire      : {}", "▸".cyan(), format!("{}", config.numeraire).white());
    println!(
        "  {} Asset Sırası   : {}",
        "▸".cyan(),
        if config.is_token0 { "token0 (asset < numeraire)" } else { "token1 (asset > numeraire)" }.white()
    );
    println!(
        "  {} Hook Bayrakları: {}",
        "▸".cyan(),
        format!("0x{:04X} [{}]", config.required_flags, hook_flags::describe(config.required_flags).join(", ")).white()
    );
    println!("  {} Fiyat Kaynağı  : {}", "▸".cyan(), config.price_source.to_string().white());
    println!("  {} Fee Tier       : {}", "▸".cyan(), config.fee_tier.to_string().white());
    println!(
        "  {} Aralık         : {}",
        "▸".cyan(),
        match config.balanced_range_spacings {
            Some(n) => format!("tek taraflı {} spacing + dengeli ±{} spacing", config.range_spacings, n),
            None => format!("tek taraflı {} spacing", config.range_spacings),
        }
        .white()
    );
    println!(
        "  {} Madenci        : {}",
        "▸".cyan(),
        if config.miner_threads > 1 {
            format!("paralel ({} thread)", config.miner_threads)
        } else {
            "sıralı referans tarama".to_string()
        }
        .white()
    );
    println!(
        "  {} Doluluk        : {}",
        "▸".cyan(),
        if config.rpc_http_url.is_some() {
            "CANLI (eth_getCode)".green().bold().to_string()
        } else {
            "OFFLINE (hiçbir adres dolu sayılmaz)".yellow().bold().to_string()
        }
    );
    println!(
        "  {} Başlangıç      : {}",
        "▸".cyan(),
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string().yellow()
    );
    println!();
}

fn print_plan(plan: &LaunchPlan) {
    println!("{}", "  ┌──────────────────────────────────────────────────────────────┐".dimmed());
    println!("  {} {}", "│".dimmed(), "Madencilik Sonucu:".white().bold());
    println!("  {}   Salt        : {} (#{})", "│".dimmed(), plan.mining.salt, plan.mining.salt_index());
    println!(
        "  {}   Hook        : {} [0x{:04X}]",
        "│".dimmed(),
        plan.mining.hook_address,
        hook_flags::flags_of(plan.mining.hook_address)
    );
    println!("  {}   Asset Token : {}", "│".dimmed(), plan.mining.asset_address);
    println!(
        "  {}   Süre        : {:.1}ms{}",
        "│".dimmed(),
        plan.mining_elapsed.as_secs_f64() * 1000.0,
        plan.oracle_queries
            .map(|q| format!(" ({} eth_getCode sorgusu)", q))
            .unwrap_or_default()
    );
    println!("  {}", "│".dimmed());
    println!("  {} {}", "│".dimmed(), "Pozisyonlar:".white().bold());
    println!(
        "  {}   Güncel tick : {} (fee {}, spacing {})",
        "│".dimmed(),
        plan.price.tick,
        plan.fee_tier,
        plan.tick_spacing
    );
    for position in &plan.positions {
        println!(
            "  {}   {} {:<12} {} ({} tick)  fiyat [{:.6} — {:.6}]  likidite {}",
            "│".dimmed(),
            "🔵",
            position.slug_name,
            position.range,
            position.range.width(),
            math::tick_to_price_ratio(position.range.tick_lower),
            math::tick_to_price_ratio(position.range.tick_upper),
            position.liquidity
        );
    }
    println!("{}", "  └──────────────────────────────────────────────────────────────┘".dimmed());
    println!();
}

// ─────────────────────────────────────────────────────────────────────────────
// Ana Program
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // .env dosyasını yükle
    dotenvy::dotenv().ok();

    let config = PlannerConfig::from_env()?;
    print_banner(&config);

    println!("  {} [{}] Salt aranıyor...", "⛏️".yellow(), timestamp());
    let plan = planner::build_launch_plan(&config)
        .await
        .wrap_err("Plan oluşturulamadı")?;
    println!("  {} [{}] Plan hazır.", "✅".green(), timestamp());
    println!();
    print_plan(&plan);

    let report = plan.slug_report();
    if config.slug_output == "-" {
        print!("{}", report.to_logs_block()?);
    } else {
        std::fs::write(&config.slug_output, report.to_logs_block()?)
            .map_err(|e| eyre::eyre!("{} yazılamadı: {}", config.slug_output, e))?;
        println!(
            "  {} Slug raporu kaydedildi: {}",
            "💾".green(),
            config.slug_output.white()
        );
    }

    Ok(())
}
