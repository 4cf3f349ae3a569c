//! The `import` subcommand: parse, classify, plan, and persist a catalog.
//!
//! Products are processed sequentially in catalog file order so log output
//! and sort counters stay deterministic. A missing local image file is
//! logged and skipped; a failed remote fetch or storage upload aborts the
//! run so a flaky network never silently produces a half-imported catalog.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use sqlx::PgPool;

use shopstock_core::{load_app_config, slugify, ImageSource};
use shopstock_db::storage::content_type_for;
use shopstock_db::{PoolConfig, StorageClient};
use shopstock_import::{
    prepare_products, read_catalog_rows, read_image_rows, walk_image_files, ClassifierConfig,
    ImageRecorder, PreparedProduct,
};

use crate::ImportArgs;

#[derive(Debug, Default)]
struct RunTotals {
    products: usize,
    skus: usize,
    images_uploaded: usize,
    images_skipped: usize,
}

pub(crate) async fn run_import(args: &ImportArgs) -> anyhow::Result<()> {
    let catalog_file = std::fs::File::open(&args.file)
        .with_context(|| format!("opening catalog file {}", args.file.display()))?;
    let rows = read_catalog_rows(catalog_file)
        .with_context(|| format!("reading catalog file {}", args.file.display()))?;

    let image_rows = match &args.images_file {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening images file {}", path.display()))?;
            read_image_rows(file).with_context(|| format!("reading images file {}", path.display()))?
        }
        None => Vec::new(),
    };

    let listing = match walk_image_files(&args.images_dir) {
        Ok(listing) => listing,
        Err(e) => {
            tracing::warn!(
                dir = %args.images_dir.display(),
                error = %e,
                "images directory not readable; continuing without discovery"
            );
            Vec::new()
        }
    };

    let classifier = ClassifierConfig::default();
    let prepared = prepare_products(&classifier, rows, &image_rows, &listing);

    if args.dry_run {
        print_dry_run(&prepared);
        return Ok(());
    }

    let config = load_app_config()?;
    let pool = shopstock_db::connect_pool(
        &config.database_url,
        PoolConfig {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        },
    )
    .await
    .context("connecting to database")?;
    let storage = StorageClient::new(
        &config.storage_url,
        &config.storage_bucket,
        &config.storage_key,
        config.http_timeout_secs,
        &config.http_user_agent,
    )?;

    let mut totals = RunTotals::default();
    for product in &prepared {
        import_product(&pool, &storage, &args.images_dir, product, &mut totals)
            .await
            .with_context(|| format!("importing product {}", product.product.public_id))?;
    }

    println!(
        "imported {} product(s), {} SKU(s), {} image(s) uploaded, {} skipped",
        totals.products, totals.skus, totals.images_uploaded, totals.images_skipped
    );
    Ok(())
}

async fn import_product(
    pool: &PgPool,
    storage: &StorageClient,
    images_dir: &Path,
    prepared: &PreparedProduct,
    totals: &mut RunTotals,
) -> anyhow::Result<()> {
    let product = &prepared.product;

    let brand_id = shopstock_db::upsert_brand(pool, &product.brand, &slugify(&product.brand))
        .await
        .with_context(|| format!("upserting brand '{}'", product.brand))?;
    let category_id =
        shopstock_db::upsert_category(pool, &product.category, &slugify(&product.category))
            .await
            .with_context(|| format!("upserting category '{}'", product.category))?;
    let product_id = shopstock_db::upsert_product(pool, brand_id, category_id, product)
        .await
        .context("upserting product")?;

    for sku in &product.skus {
        let sku_id = shopstock_db::upsert_sku(pool, product_id, sku)
            .await
            .with_context(|| format!("upserting SKU '{}'", sku.sku_code))?;
        shopstock_db::upsert_price(pool, sku_id, sku).await?;
        shopstock_db::upsert_inventory(pool, sku_id, sku.quantity).await?;
        totals.skus += 1;
    }

    let mut recorder = ImageRecorder::new();
    for planned in &prepared.plan {
        let file_name = planned.source.file_name();
        let bytes = match &planned.source {
            ImageSource::Local(relative) => {
                let path = images_dir.join(relative);
                match std::fs::read(&path) {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        tracing::warn!(
                            product = %product.public_id,
                            file = %path.display(),
                            "planned image file missing; skipping"
                        );
                        totals.images_skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("reading image file {}", path.display()));
                    }
                }
            }
            // Remote failures are fatal: the catalog explicitly asked for
            // this URL, so silently dropping it would corrupt the image set.
            ImageSource::Remote(url) => storage
                .download(url)
                .await
                .with_context(|| format!("fetching remote image {url}"))?,
        };

        let key = storage_key(&product.public_id, &file_name);
        let url = storage
            .upload(&key, bytes, content_type_for(&file_name))
            .await
            .with_context(|| format!("uploading image '{key}'"))?;
        recorder.record(planned, url);
        totals.images_uploaded += 1;
    }

    let images = recorder.finish();
    shopstock_db::replace_product_images(pool, product_id, &images)
        .await
        .context("replacing product images")?;

    println!(
        "imported {}: {} SKU(s), {} image(s)",
        product.public_id,
        product.skus.len(),
        images.len()
    );
    totals.products += 1;
    Ok(())
}

fn print_dry_run(prepared: &[PreparedProduct]) {
    for p in prepared {
        println!(
            "{}: {} SKU(s), colors [{}]",
            p.product.public_id,
            p.product.skus.len(),
            p.color_order.join(", ")
        );
        for planned in &p.plan {
            match &planned.color {
                Some(color) => println!("  {} ({color})", planned.source.file_name()),
                None => println!("  {}", planned.source.file_name()),
            }
        }
    }
    println!("dry run: {} product(s), nothing written", prepared.len());
}

fn storage_key(public_id: &str, file_name: &str) -> String {
    format!("product/{public_id}/{file_name}")
}
