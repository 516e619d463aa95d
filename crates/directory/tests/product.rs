use repdesk_directory::{BrandInput, Directory, ProductInput};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_products_by_brand_and_brand_delete() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let directory = Directory(state);

    let brand = directory
        .create_brand(BrandInput {
            name: "Cardiolab".to_owned(),
            description: None,
        })
        .await?;

    for name in ["Vasoline", "Aortix"] {
        directory
            .create_product(ProductInput {
                name: name.to_owned(),
                description: None,
                brand_id: Some(brand.to_owned()),
            })
            .await?;
    }
    let unbranded = directory
        .create_product(ProductInput {
            name: "Generic".to_owned(),
            ..Default::default()
        })
        .await?;

    let products = directory.products_by_brand(&brand).await?;
    assert_eq!(
        products.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
        vec!["Aortix", "Vasoline"]
    );
    assert!(
        products
            .iter()
            .all(|p| p.brand_name.as_deref() == Some("Cardiolab"))
    );

    directory.delete_brand(&brand).await?;

    assert!(directory.products_by_brand(&brand).await?.is_empty());
    assert_eq!(directory.list_products().await?.len(), 3);
    assert_eq!(directory.count_products().await?, 3);

    directory.delete_product(&unbranded).await?;
    assert_eq!(directory.list_products().await?.len(), 2);
    assert_eq!(directory.count_products().await?, 2);

    Ok(())
}

#[tokio::test]
async fn test_delete_product_in_use() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let pool = state.write_db.clone();
    let directory = Directory(state);

    let product = directory
        .create_product(ProductInput {
            name: "Aortix".to_owned(),
            ..Default::default()
        })
        .await?;
    sqlx::query("INSERT INTO assignment_product (assignment_id, product_id) VALUES (?, ?)")
        .bind("01ASSIGNMENT")
        .bind(&product)
        .execute(&pool)
        .await?;

    let resp = directory.delete_product(&product).await;
    assert_eq!(
        resp.unwrap_err().to_string(),
        "Product is still linked to assignments"
    );
    assert!(directory.find_product(&product).await?.is_some());

    sqlx::query("DELETE FROM assignment_product")
        .execute(&pool)
        .await?;
    directory.delete_product(&product).await?;
    assert!(directory.find_product(&product).await?.is_none());

    let resp = directory.delete_product(&product).await;
    assert!(matches!(resp, Err(repdesk_shared::Error::NotFound(_))));

    Ok(())
}
