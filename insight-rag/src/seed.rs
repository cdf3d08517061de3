//! Built-in seed documents written into empty storage on first run.

use crate::document::Document;

const SEED: &[(&str, &str, &str)] = &[
    (
        "doc_01",
        "GraphQL in Enterprise: API Integration",
        "GraphQL excels in enterprise SaaS by enabling flexible API integration. It allows clients to request exactly the data they need, reducing over-fetching and under-fetching common in REST APIs. This is particularly valuable when dealing with complex, nested data structures typical in enterprise applications.",
    ),
    (
        "doc_02",
        "GraphQL: Real-time Data Updates",
        "GraphQL subscriptions provide real-time data updates in enterprise SaaS applications. This feature is crucial for dashboards, monitoring tools, and collaborative features where users need immediate data synchronization. The subscription mechanism ensures efficient real-time communication between server and clients.",
    ),
    (
        "doc_03",
        "GraphQL Performance Optimization",
        "In enterprise SaaS, GraphQL's ability to batch multiple queries into a single request significantly improves performance. This reduces network overhead and server load, especially important for mobile applications or distributed systems where bandwidth efficiency is crucial.",
    ),
    (
        "doc_04",
        "AI and Machine Learning Overview",
        "AI and machine learning are transforming enterprise software. From predictive analytics to natural language processing, these technologies enable automation and intelligent decision-making at scale.",
    ),
    (
        "doc_05",
        "Cloud Computing Fundamentals",
        "Cloud computing provides scalable, flexible infrastructure for modern applications. Key concepts include IaaS, PaaS, and SaaS models, each serving different enterprise needs.",
    ),
    (
        "doc_06",
        "Microservices Architecture",
        "Microservices architecture breaks down complex applications into smaller, independent services. This approach improves scalability, maintainability, and deployment flexibility.",
    ),
    (
        "doc_07",
        "DevOps Best Practices",
        "DevOps combines development and operations to streamline software delivery. Key practices include continuous integration, continuous deployment, and automated testing.",
    ),
    (
        "doc_08",
        "Data Security in Enterprise",
        "Enterprise data security encompasses encryption, access control, and compliance measures. Regular security audits and updates are essential for maintaining data integrity.",
    ),
    (
        "doc_09",
        "API Design Patterns",
        "Effective API design follows RESTful principles, ensures versioning, and provides comprehensive documentation. These patterns promote API adoption and maintainability.",
    ),
    (
        "doc_10",
        "Scalable Database Systems",
        "Modern database systems must handle increasing data volumes while maintaining performance. Solutions include sharding, replication, and optimized indexing strategies.",
    ),
];

/// The fixed seed set, ordered by id.
pub fn seed_documents() -> Vec<Document> {
    SEED.iter().map(|(id, title, content)| Document::new(*id, *title, *content)).collect()
}
