//! End-to-end tests of the generation pipeline against the shop fixture

use std::path::PathBuf;

use tempfile::tempdir;
use typegen_core::{build_output, generate, inspect, Config, Error, MetadataContext, OutputFile};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop.yaml")
}

async fn shop() -> MetadataContext {
    MetadataContext::from_file(fixture()).await.unwrap()
}

fn config(types: &str, api: &str) -> Config {
    let mut config = Config::new(fixture().to_string_lossy(), vec!["out".to_string()]);
    config.types_target = types.to_string();
    config.api_target = api.to_string();
    config
}

fn file<'a>(files: &'a [OutputFile], location: &str) -> &'a OutputFile {
    files
        .iter()
        .find(|file| file.location == location)
        .unwrap_or_else(|| panic!("no file at {location}"))
}

#[tokio::test]
async fn typescript_types_follow_the_class_hierarchy() {
    let metadata = shop().await;
    let files = build_output(&metadata, &config("typescript", "react_query")).unwrap();

    let locations: Vec<_> = files.iter().map(|f| f.location.as_str()).collect();
    assert_eq!(
        locations,
        vec![
            "types/Product",
            "types/Category",
            "types/ProductFilter",
            "endpoints/ProductController",
        ]
    );

    let product = file(&files, "types/Product").render();
    assert_eq!(
        product,
        "import Category from './Category';\n\
         \n\
         export default interface Product {\n  \
         title: string;\n  \
         category: Category;\n  \
         price: number;\n  \
         tags: string[];\n  \
         attributes: Record<string, string>;\n  \
         description?: string;\n  \
         id: number;\n  \
         createdAt: Date;\n\
         }\n"
    );

    let filter = file(&files, "types/ProductFilter");
    assert!(filter.body.contains("  category?: Category;"));
}

#[tokio::test]
async fn react_query_bindings() {
    let metadata = shop().await;
    let files = build_output(&metadata, &config("typescript", "react_query")).unwrap();
    let controller = file(&files, "endpoints/ProductController").render();

    assert!(controller.starts_with(
        "import axios from 'axios';\n\
         import { UseInfiniteQueryOptions, UseMutationOptions, UseQueryOptions, useInfiniteQuery, useMutation, useQuery } from '@tanstack/react-query';\n\
         import Product from '../types/Product';\n\
         import ProductFilter from '../types/ProductFilter';\n\
         \n\
         export default class ProductController {\n"
    ));
    assert!(controller.contains("axios.get<Product>(`/api/products/${id}`)"));
    assert!(controller.contains(
        "useInfiniteQuery: (filter: ProductFilter, size: number, options?:"
    ));
    assert!(controller.contains(
        "axios.get<Product[]>('/api/products', { params: { size, ...filter, page: pageParam } })"
    ));
    assert!(controller.contains("lastPage.length < size ? undefined : pages.length"));
    assert!(controller.contains("axios.post<Product>('/api/products', data)"));
    assert!(controller.contains("axios.delete<void>(`/api/products/${id}`)"));
}

#[tokio::test]
async fn zod_schemas_for_request_bodies() {
    let metadata = shop().await;
    let files = build_output(&metadata, &config("zod", "angular")).unwrap();

    let product = file(&files, "types/Product");
    let imports: Vec<String> = product.imports.iter().map(ToString::to_string).collect();
    assert_eq!(
        imports,
        vec![
            "import { z } from 'zod';",
            "import { CategoryModel } from './Category';",
        ]
    );
    for line in [
        r#"  title: z.string().max(80, { message: "size must be at most 80" }).regex(/^(?!\s*$).+/, { message: "must not be blank" }),"#,
        "  category: CategoryModel,",
        r#"  price: z.number().min(0, { message: "must be greater than or equal to 0" }),"#,
        "  tags: z.string().array(),",
        "  attributes: z.record(z.string(), z.string()),",
        "  description: z.string().optional().nullable(),",
        "  id: z.number().int(),",
        "  createdAt: z.coerce.date(),",
    ] {
        assert!(product.body.contains(line), "missing {line} in\n{}", product.body);
    }

    let category = file(&files, "types/Category");
    assert!(category.body.contains("z.enum(["));

    // only reachable from a query parameter, so it stays an interface
    let filter = file(&files, "types/ProductFilter");
    assert!(filter.body.starts_with("export default interface ProductFilter {"));
}

#[tokio::test]
async fn angular_service() {
    let metadata = shop().await;
    let mut config = config("typescript", "angular");
    config.use_string_as_date = true;
    config.angular_environment_import = "../../environments/environment".to_string();
    let files = build_output(&metadata, &config).unwrap();

    let service = file(&files, "endpoints/product.service").render();
    assert!(service.contains("import { environment } from '../../environments/environment';"));
    assert!(service.contains("import { HttpClient, HttpParams } from '@angular/common/http';"));
    assert!(service.contains("export class ProductService {"));
    assert!(service.contains("    create(body: Product): Observable<Product> {"));
    assert!(service.contains("        if (filter.category) {"));
    assert!(service.contains("params = params.append('filter.category', filter.category);"));
    assert!(service.contains("this.http.delete<void>(this.baseURL + `/api/products/${id}`, { headers });"));

    let product = file(&files, "types/Product");
    assert!(product.body.contains("  createdAt: string;"));
}

#[tokio::test]
async fn inspect_reports_the_resolved_model() {
    let metadata = shop().await;
    let model = inspect(&metadata).unwrap();

    let types = model["types"].as_array().unwrap();
    assert_eq!(types.len(), 3);
    assert_eq!(types[0]["name"], "Product");
    assert_eq!(types[0]["needs_validation"], true);
    assert_eq!(types[2]["needs_validation"], false);

    let search = &model["endpoints"][1];
    assert_eq!(search["method"], "search");
    assert_eq!(search["paging"]["page_variable"], "page");
    assert_eq!(search["paging"]["page_size_variable"], "size");
    assert_eq!(search["return_type"]["array"]["named"], "Product");
}

#[tokio::test]
async fn generate_writes_files_with_imports() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("src/api");
    let mut config = config("zod", "react_query");
    config.output_dirs = vec![out.to_string_lossy().to_string()];

    let written = generate(&config).await.unwrap();
    assert_eq!(written.len(), 4);

    let category = tokio::fs::read_to_string(out.join("types/Category.ts")).await.unwrap();
    assert!(category.starts_with("import { z } from 'zod';\n\nexport const CategoryModel = z.enum(["));
}

#[tokio::test]
async fn missing_metadata_is_an_io_error() {
    let mut config = config("typescript", "react_query");
    config.metadata_path = "does/not/exist.yaml".to_string();
    assert!(matches!(generate(&config).await, Err(Error::Io(_))));
}
