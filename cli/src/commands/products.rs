use anyhow::Result;
use bazaar_client::app::CreateProductInput;
use bazaar_client::container::{
    CreateProduct, DeleteProduct, GetMyProducts, GetProduct, GetProducts, MarkProductSold,
    PublishProduct, UnpublishProduct, UpdateProduct,
};
use bazaar_client::{keys, Container, NewProduct, ProductFilter, ProductUpdate};

use super::{read_image, use_case, ProductsCommand};
use crate::output;

pub async fn run(container: &Container, command: ProductsCommand) -> Result<()> {
    match command {
        ProductsCommand::List {
            search,
            category,
            min_price,
            max_price,
            location,
            sort,
            page,
            limit,
        } => {
            let filter = ProductFilter {
                search,
                category,
                min_price,
                max_price,
                location,
                status: None,
                sort,
                page,
                limit,
            };
            let page = use_case::<GetProducts>(container, keys::GET_PRODUCTS)?
                .execute(filter)
                .await?;
            output::product_page(&page);
        }
        ProductsCommand::Show { id } => {
            let product = use_case::<GetProduct>(container, keys::GET_PRODUCT)?
                .execute(&id)
                .await?;
            output::product(&product);
        }
        ProductsCommand::Create {
            title,
            description,
            price,
            category,
            location,
            images,
            publish,
        } => {
            let mut uploads = Vec::with_capacity(images.len());
            for path in &images {
                uploads.push(read_image(path).await?);
            }
            let product = use_case::<CreateProduct>(container, keys::CREATE_PRODUCT)?
                .execute(CreateProductInput {
                    product: NewProduct {
                        title,
                        description,
                        price,
                        category,
                        location,
                    },
                    images: uploads,
                    publish,
                })
                .await?;
            println!("Created listing {} ({})", product.id, product.status);
        }
        ProductsCommand::Edit {
            id,
            title,
            description,
            price,
            category,
            location,
        } => {
            let product = use_case::<UpdateProduct>(container, keys::UPDATE_PRODUCT)?
                .execute(
                    &id,
                    ProductUpdate {
                        title,
                        description,
                        price,
                        category,
                        location,
                    },
                )
                .await?;
            output::product(&product);
        }
        ProductsCommand::Publish { id } => {
            let product = use_case::<PublishProduct>(container, keys::PUBLISH_PRODUCT)?
                .execute(&id)
                .await?;
            println!("{} is now {}", product.title, product.status);
        }
        ProductsCommand::Unpublish { id } => {
            let product = use_case::<UnpublishProduct>(container, keys::UNPUBLISH_PRODUCT)?
                .execute(&id)
                .await?;
            println!("{} is now {}", product.title, product.status);
        }
        ProductsCommand::Sold { id } => {
            let product = use_case::<MarkProductSold>(container, keys::MARK_PRODUCT_SOLD)?
                .execute(&id)
                .await?;
            println!("{} is now {}", product.title, product.status);
        }
        ProductsCommand::Delete { id } => {
            use_case::<DeleteProduct>(container, keys::DELETE_PRODUCT)?
                .execute(&id)
                .await?;
            println!("Deleted listing {}", id);
        }
        ProductsCommand::Mine { status } => {
            let products = use_case::<GetMyProducts>(container, keys::GET_MY_PRODUCTS)?
                .execute(status)
                .await?;
            output::product_list(&products);
        }
    }
    Ok(())
}
