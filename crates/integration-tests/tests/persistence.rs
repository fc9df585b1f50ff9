//! Cart and wishlist surviving page loads through file storage.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use sia_core::{ItemSnapshot, Price, Product, ProductId, VariantSelection, WishlistEntry};
use sia_storefront::persistence::{keys, save_entries};
use sia_storefront::{
    ActionOutcome, CatalogSnapshot, FileStorage, RenderedSurfaces, Storefront, Surface,
};

type Shop = Storefront<FileStorage, RenderedSurfaces>;

fn products() -> Vec<Product> {
    vec![
        Product::new("p-lehenga", "Bridal Lehenga", Price::from_rupees(2500))
            .with_colors(["Red", "Green"])
            .with_sizes(["S", "M"]),
        Product::new("p-clutch", "Zari Clutch", Price::from_rupees(1000)),
    ]
}

fn page_load(dir: &Path, with_catalog: bool) -> Shop {
    let storage = FileStorage::open(dir.join("local")).unwrap();
    let session = FileStorage::open(dir.join("session")).unwrap();
    let mut shop = Storefront::new(storage, session, RenderedSurfaces::new());
    if with_catalog {
        let ticket = shop.begin_catalog_load();
        shop.finish_catalog_load(
            ticket,
            CatalogSnapshot {
                products: products(),
                ..CatalogSnapshot::default()
            },
        );
    }
    shop
}

fn surface(shop: &Shop, surface: Surface) -> String {
    shop.display().sink().get(surface).unwrap().to_string()
}

#[test]
fn test_cart_and_badges_rehydrate_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut shop = page_load(dir.path(), true);
        shop.add_to_cart(&ProductId::new("p-clutch"));
        shop.add_to_cart(&ProductId::new("p-clutch"));
        shop.toggle_wishlist(&ProductId::new("p-clutch"));
    }

    // Rendered before any catalog is available
    let shop = page_load(dir.path(), false);
    assert_eq!(shop.store().cart_count(), 2);
    assert_eq!(shop.store().wishlist().len(), 1);

    assert!(surface(&shop, Surface::HeaderCartCount).contains(">2<"));
    assert!(surface(&shop, Surface::HeaderWishlistCount).contains(">1<"));
    assert!(surface(&shop, Surface::CartTotal).contains("₹2,000"));
    assert!(surface(&shop, Surface::CartSidebar).contains("Zari Clutch"));
}

#[test]
fn test_empty_storage_renders_empty_states() {
    let dir = tempfile::tempdir().unwrap();
    let shop = page_load(dir.path(), false);

    assert!(surface(&shop, Surface::CartSidebar).contains("Your cart is empty"));
    assert!(surface(&shop, Surface::WishlistSidebar).contains("Your wishlist is empty"));
    assert!(surface(&shop, Surface::BottomBarCartCount).contains("display: none"));
}

#[test]
fn test_corrupt_cart_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("local")).unwrap();
    std::fs::write(dir.path().join("local").join("cart.json"), "{not json").unwrap();

    let mut shop = page_load(dir.path(), true);
    assert_eq!(shop.store().cart_len(), 0);

    // The next write replaces the corrupt file
    shop.add_to_cart(&ProductId::new("p-clutch"));
    assert_eq!(page_load(dir.path(), false).store().cart_len(), 1);
}

#[test]
fn test_move_all_keeps_each_saved_variant() {
    let dir = tempfile::tempdir().unwrap();
    let lehenga = ItemSnapshot::from(&products()[0]);
    let clutch = ItemSnapshot::from(&products()[1]);

    // The same lehenga saved twice in different sizes, plus a clutch
    let mut storage = FileStorage::open(dir.path().join("local")).unwrap();
    save_entries(
        &mut storage,
        keys::WISHLIST,
        &[
            WishlistEntry::new(
                VariantSelection::new("p-lehenga", Some("Red".to_string()), Some("S".to_string())),
                lehenga.clone(),
            ),
            WishlistEntry::new(
                VariantSelection::new("p-lehenga", Some("Red".to_string()), Some("M".to_string())),
                lehenga,
            ),
            WishlistEntry::new(VariantSelection::plain("p-clutch"), clutch),
        ],
    );

    let mut shop = page_load(dir.path(), true);
    assert_eq!(shop.store().wishlist().len(), 3);

    let outcome = shop.move_all_wishlist_to_cart();
    assert_eq!(outcome, ActionOutcome::MovedToCart { count: 3 });
    assert_eq!(outcome.message().as_deref(), Some("3 items added to cart!"));

    let reloaded = page_load(dir.path(), false);
    assert!(reloaded.store().wishlist().is_empty());
    let sizes: Vec<_> = reloaded
        .store()
        .cart()
        .iter()
        .map(|l| l.selection.size.as_deref())
        .collect();
    assert_eq!(sizes, [Some("S"), Some("M"), None]);
    assert_eq!(reloaded.store().cart_total(), Price::from_rupees(6000));
}

#[test]
fn test_move_to_cart_merges_with_existing_line() {
    let dir = tempfile::tempdir().unwrap();
    let mut shop = page_load(dir.path(), true);
    let clutch = ProductId::new("p-clutch");

    shop.add_to_cart(&clutch);
    shop.toggle_wishlist(&clutch);
    assert_eq!(shop.move_to_cart(&clutch), ActionOutcome::MovedToCart { count: 1 });

    assert_eq!(shop.store().cart_len(), 1);
    assert_eq!(shop.store().cart()[0].quantity, 2);
    assert!(!shop.store().contains_wishlist(&clutch));
}
