use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use crate::domain::inventory::{
  ImageFile, ImageService, ImageServiceError, InventoryService, Money, NewProduct, Product,
  ProductId, ProductRepository, RepositoryError, StockMovement, StockMovementRepository,
  UploadImageOptions, UploadedImage,
};
use crate::domain::sales::{Sale, SaleRepository, SaleService};
use crate::infrastructure::persistence::memory::{
  InMemoryProductRepository, InMemorySaleRepository, InMemoryStockMovementRepository,
  InMemoryStore,
};

/// Services wired over one in-memory store.
pub(crate) struct TestContext {
  pub store: Arc<InMemoryStore>,
  pub products: Arc<InMemoryProductRepository>,
  pub movements: Arc<InMemoryStockMovementRepository>,
  pub sales: Arc<InMemorySaleRepository>,
  pub inventory: Arc<InventoryService>,
  pub sale_service: Arc<SaleService>,
}

impl TestContext {
  pub fn new() -> Self {
    let store = Arc::new(InMemoryStore::new());
    let products = Arc::new(InMemoryProductRepository::new(store.clone()));
    let movements = Arc::new(InMemoryStockMovementRepository::new(store.clone()));
    let sales = Arc::new(InMemorySaleRepository::new(store.clone()));
    let inventory = Arc::new(InventoryService::new(products.clone(), movements.clone()));
    let sale_service = Arc::new(SaleService::new(sales.clone(), inventory.clone()));
    Self {
      store,
      products,
      movements,
      sales,
      inventory,
      sale_service,
    }
  }

  pub async fn seed_product(&self, id: &str, price: Decimal, stock: i64) -> Product {
    let product = Product::create(NewProduct {
      id: id.to_string(),
      name: format!("Product {}", id),
      price: Money::new(price, "MXN").unwrap(),
      stock,
      description: None,
      category: None,
      image_url: None,
    })
    .unwrap();
    self.products.save(&product).await.unwrap();
    product
  }

  /// Inventory service over the same store whose stock writes always conflict.
  pub fn conflicting_inventory(&self) -> Arc<InventoryService> {
    Arc::new(InventoryService::new(
      Arc::new(ConflictingProductRepository::new(self.products.clone())),
      self.movements.clone(),
    ))
  }

  pub async fn stock_of(&self, id: &str) -> u32 {
    self
      .products
      .find_by_id(&ProductId::new(id).unwrap())
      .await
      .unwrap()
      .map(|p| p.stock())
      .unwrap()
  }

  pub async fn movements_of(&self, id: &str) -> Vec<StockMovement> {
    self
      .movements
      .find_by_product_id(&ProductId::new(id).unwrap())
      .await
      .unwrap()
  }

  pub async fn find_sale(&self, id: uuid::Uuid) -> Option<Sale> {
    self.sales.find_by_id(id).await.unwrap()
  }
}

/// Product storage whose stock writes always lose the compare-and-swap, as if
/// another writer changed the stock between read and write.
pub(crate) struct ConflictingProductRepository {
  inner: Arc<dyn ProductRepository>,
}

impl ConflictingProductRepository {
  pub fn new(inner: Arc<dyn ProductRepository>) -> Self {
    Self { inner }
  }
}

#[async_trait]
impl ProductRepository for ConflictingProductRepository {
  async fn save(&self, product: &Product) -> Result<(), RepositoryError> {
    self.inner.save(product).await
  }

  async fn update_stock(
    &self,
    _product: &Product,
    _expected_stock: u32,
  ) -> Result<bool, RepositoryError> {
    Ok(false)
  }

  async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
    self.inner.find_by_id(id).await
  }

  async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
    self.inner.find_all().await
  }

  async fn find_by_category(&self, category: &str) -> Result<Vec<Product>, RepositoryError> {
    self.inner.find_by_category(category).await
  }

  async fn find_low_stock(&self, threshold: u32) -> Result<Vec<Product>, RepositoryError> {
    self.inner.find_low_stock(threshold).await
  }

  async fn find_out_of_stock(&self) -> Result<Vec<Product>, RepositoryError> {
    self.inner.find_out_of_stock().await
  }

  async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
    self.inner.search(query).await
  }

  async fn search_by_name(&self, name: &str) -> Result<Vec<Product>, RepositoryError> {
    self.inner.search_by_name(name).await
  }

  async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    self.inner.delete(id).await
  }

  async fn exists(&self, id: &ProductId) -> Result<bool, RepositoryError> {
    self.inner.exists(id).await
  }
}

/// Image service double that records calls.
#[derive(Default)]
pub(crate) struct RecordingImageService {
  pub uploads: Mutex<Vec<UploadImageOptions>>,
  pub deletions: Mutex<Vec<String>>,
  pub fail_uploads: bool,
}

#[async_trait]
impl ImageService for RecordingImageService {
  async fn upload(
    &self,
    file: ImageFile,
    options: &UploadImageOptions,
  ) -> Result<UploadedImage, ImageServiceError> {
    file.validate()?;
    if self.fail_uploads {
      return Err(ImageServiceError::UploadFailed("network down".to_string()));
    }
    self.uploads.lock().unwrap().push(options.clone());
    let public_id = options.qualified_public_id().unwrap_or_default();
    Ok(UploadedImage {
      url: format!("http://cdn.test/{}", public_id),
      secure_url: format!("https://cdn.test/{}", public_id),
      public_id,
      width: 800,
      height: 600,
      format: "png".to_string(),
      bytes: file.bytes.len() as u64,
    })
  }

  async fn delete(&self, public_id: &str) -> Result<(), ImageServiceError> {
    self.deletions.lock().unwrap().push(public_id.to_string());
    Ok(())
  }

  fn get_url(&self, public_id: &str, _options: &UploadImageOptions) -> String {
    format!("https://cdn.test/{}", public_id)
  }
}

pub(crate) fn png() -> ImageFile {
  ImageFile {
    file_name: "photo.png".to_string(),
    content_type: "image/png".to_string(),
    bytes: vec![137, 80, 78, 71],
  }
}
