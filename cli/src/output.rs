//! Terminal rendering

use bazaar_client::{Product, ProductPage, User};

pub fn user(user: &User) {
    println!("{} <{}>", user.name, user.email);
    if let Some(phone) = &user.phone {
        println!("  phone:  {}", phone);
    }
    if let Some(avatar) = &user.avatar_url {
        println!("  avatar: {}", avatar);
    }
    println!("  member since {}", user.created_at.format("%Y-%m-%d"));
}

pub fn product(product: &Product) {
    println!("{}  [{}]", product.title, product.status);
    println!("  id:       {}", product.id);
    println!("  price:    {:.2}", product.price);
    println!("  category: {}", product.category);
    if let Some(location) = &product.location {
        println!("  location: {}", location);
    }
    for image in &product.images {
        println!("  image:    {}", image);
    }
    println!();
    println!("{}", product.description);
}

fn product_line(product: &Product) {
    println!(
        "{}  {:>10.2}  {:<10} {}",
        product.id,
        product.price,
        product.status.to_string(),
        product.title
    );
}

pub fn product_list(products: &[Product]) {
    if products.is_empty() {
        println!("No listings");
        return;
    }
    for p in products {
        product_line(p);
    }
}

pub fn product_page(page: &ProductPage) {
    product_list(&page.items);
    if !page.items.is_empty() {
        let more = if page.has_more() {
            format!(" (next: --page {})", page.page + 1)
        } else {
            String::new()
        };
        println!("page {} of {} results{}", page.page, page.total, more);
    }
}

pub fn session_expired() {
    eprintln!("Your session has expired. Sign in again with `bazaar signin`.");
}
