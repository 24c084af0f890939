//! Site Steward - demo runner
//!
//! Lays out a colony and one expansion on generated terrain, then runs the
//! site registry against the in-memory world for a fixed number of ticks.

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use site_steward::core::config::SiteConfig;
use site_steward::core::error::{Result, SiteError};
use site_steward::core::types::{Cell, FacilityId, SiteId, SiteKind, SourceId, StructureKind, GRID_SIZE};
use site_steward::plan::{SitePlan, SitePlanBuilder, Stamp};
use site_steward::site::{SiteRecord, SiteRegistry};
use site_steward::spatial::{Terrain, TerrainMask};
use site_steward::world::{SimFacility, SimSite, SimWorld};

/// Run the site control loop over a simulated territory
#[derive(Parser, Debug)]
#[command(name = "site-steward")]
#[command(about = "Run the site control loop over a simulated territory")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 500)]
    ticks: u64,

    /// Random seed for terrain and source placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Controller settings (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final site records as JSON instead of a summary
    #[arg(long, default_value_t = false)]
    json: bool,
}

const OUTCROPS: usize = 40;
const SOURCE_ATTEMPTS: usize = 100;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("site_steward=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SiteConfig::load_from_toml(path)?,
        None => SiteConfig::default(),
    };
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut world = SimWorld::new();
    let mut registry = SiteRegistry::new(config.clone());

    let colony = SiteId::new("W1N1");
    let terrain = TerrainMask::generate(&mut rng, OUTCROPS);
    let mut builder = SitePlanBuilder::new();
    add_sources(&mut builder, &colony, 2, &terrain, &mut rng)?;
    let core = builder.place_stamp(&Stamp::core(), &terrain)?;
    let spawn = Cell::new(core.x + 2, core.y + 2);
    let containers: Vec<Cell> = builder.plan().sources.iter().map(|s| s.container).collect();
    for container in containers {
        builder.connect(spawn, container, &terrain);
    }
    let plan = builder.build();

    let mut colony_site = SimSite::new(terrain);
    colony_site.build_structure(spawn, StructureKind::Spawn);
    world.add_site(colony.clone(), colony_site);
    world.facilities.add(SimFacility::new(FacilityId(1), colony.clone(), 800, 15));
    register(&mut registry, colony, SiteKind::Colony, plan, core, &config)?;

    let expansion = SiteId::new("W2N1");
    let terrain = TerrainMask::generate(&mut rng, OUTCROPS);
    let mut builder = SitePlanBuilder::new();
    add_sources(&mut builder, &expansion, 1, &terrain, &mut rng)?;
    let plan = builder.build();
    world.add_site(expansion.clone(), SimSite::new(terrain));
    register(
        &mut registry,
        expansion,
        SiteKind::Expansion,
        plan,
        Cell::new(GRID_SIZE / 2, GRID_SIZE / 2),
        &config,
    )?;

    tracing::info!("running {} ticks (seed {})", args.ticks, args.seed);
    for _ in 0..args.ticks {
        registry.tick(&mut world);
        world.advance();
    }

    if args.json {
        let records: Vec<&SiteRecord> = registry.records().collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_summary(&registry, &world);
    }
    Ok(())
}

fn register(
    registry: &mut SiteRegistry,
    id: SiteId,
    kind: SiteKind,
    plan: SitePlan,
    idle: Cell,
    config: &SiteConfig,
) -> Result<()> {
    registry.register(SiteRecord::new(id, kind, plan, idle, config))
}

/// Drop sources on random open cells until `count` of them have a container spot
fn add_sources(
    builder: &mut SitePlanBuilder,
    site: &SiteId,
    count: usize,
    terrain: &TerrainMask,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let mut placed = 0;
    for _ in 0..SOURCE_ATTEMPTS {
        if placed == count {
            return Ok(());
        }
        let cell = Cell::new(rng.gen_range(3..GRID_SIZE - 3), rng.gen_range(3..GRID_SIZE - 3));
        if terrain.is_wall(cell) {
            continue;
        }
        let id = SourceId::new(format!("{}-source-{}", site, placed));
        if builder.add_source(id, cell, terrain).is_ok() {
            placed += 1;
        }
    }
    if placed == count {
        Ok(())
    } else {
        Err(SiteError::Config(format!("could not place {} sources in {}", count, site)))
    }
}

fn print_summary(registry: &SiteRegistry, world: &SimWorld) {
    println!("\n=== SITE STEWARD: {} ticks ===", world.tick);
    for record in registry.records() {
        println!();
        println!("{} ({:?})", record.id, record.kind);
        println!(
            "  status:      {}",
            if record.dead {
                "dead"
            } else if record.satisfied {
                "satisfied"
            } else {
                "understaffed"
            }
        );
        println!("  met ratio:   {:.2}", record.satisfaction.met_ratio());
        println!("  queued:      {}", record.requested.len());

        if let Some(site) = world.site(&record.id) {
            println!("  workers:     {}", site.workers().len());
            println!("  structures:  {}", site.structure_count());
            println!("  building:    {}", site.commitments().len());
        }
    }
}
