use clap::Args;
use checkout::products::ProductId;
use checkout_app::context::AppContext;

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product identifier
    id: String,
}

pub(crate) async fn run(context: &AppContext, args: ProductArgs) -> Result<(), String> {
    let product = context
        .storefront
        .product(&ProductId::new(args.id))
        .await
        .map_err(|error| format!("failed to load product: {error}"))?;

    println!("id: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {}", product.discounted_price);
    println!("available: {}", product.available_quantity);
    println!(
        "stock: {}",
        if product.is_in_stock() { "in stock" } else { "out of stock" }
    );
    println!(
        "category: {}",
        product.category.as_deref().unwrap_or("none")
    );

    if let Some(image) = product.primary_image() {
        println!("image: {image}");
    }

    Ok(())
}
