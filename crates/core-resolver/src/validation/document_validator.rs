use crate::validation::validation_error::ValidationError;
use async_graphql_parser::types::{DocumentOperations, ExecutableDocument};
use async_graphql_value::Name;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::schema::Schema;

use super::{operation::ValidatedOperation, operation_validator::OperationValidator};

/// Context for validating a document.
pub struct DocumentValidator<'a> {
    schema: &'a Schema,
    operation_name: Option<String>,
    variables: Option<Map<String, Value>>,
    query_depth_limit: usize,
}

impl<'a> DocumentValidator<'a> {
    pub fn new(
        schema: &'a Schema,
        operation_name: Option<String>,
        variables: Option<Map<String, Value>>,
        query_depth_limit: usize,
    ) -> Self {
        Self {
            schema,
            operation_name,
            variables,
            query_depth_limit,
        }
    }

    /// Validate the query payload.
    ///
    /// Validations performed:
    /// - Validate that either there is only one operation or the operation name specified matches one of the operations in the document
    /// - Validate that there is at least one operation
    /// - Other validations are delegated to the operation validator
    #[instrument(
        name = "DocumentValidator::validate"
        skip(self, document)
        )]
    pub fn validate(
        self,
        document: ExecutableDocument,
    ) -> Result<ValidatedOperation, ValidationError> {
        let (operation_name, raw_operation) = match document.operations {
            DocumentOperations::Single(operation) => Ok((self.operation_name, operation)),
            DocumentOperations::Multiple(mut operations) => {
                if operations.is_empty() {
                    Err(ValidationError::NoOperationFound)
                } else {
                    match self.operation_name {
                        None if operations.len() == 1 => {
                            // Per https://graphql.org/learn/queries/#operation-name, `operationName` is required
                            // only for multiple operations, but async-graphql parses a named operation (`query Foo { ... }`)
                            // to `DocumentOperations::Multiple` even if there is only one operation. So we add an additional
                            // check here to make sure that the operation name is enforced only for truly multiple operations.

                            // This unwrap is okay because we already check that there is exactly one operation.
                            let (operation_name, operation) =
                                operations.into_iter().next().unwrap();
                            Ok((Some(operation_name.to_string()), operation))
                        }
                        None => Err(ValidationError::MultipleOperationsNoOperationName),
                        Some(operation_name) => {
                            let operation = operations.remove(&Name::new(&operation_name));

                            match operation {
                                None => {
                                    Err(ValidationError::MultipleOperationsUnmatchedOperationName(
                                        operation_name,
                                    ))
                                }
                                Some(operation) => Ok((Some(operation_name), operation)),
                            }
                        }
                    }
                }
            }
        }?;

        let operation_validator = OperationValidator::new(
            self.schema,
            operation_name,
            self.variables,
            document.fragments,
            self.query_depth_limit,
        );

        operation_validator.validate(raw_operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_graphql_parser::parse_query;
    use async_graphql_value::ConstValue;

    use crate::schema::Schema;

    fn create_test_schema() -> Schema {
        let report_type = {
            use async_graphql_parser::types::{ObjectType, TypeDefinition, TypeKind};
            use crate::schema::default_positioned;

            TypeDefinition {
                extend: false,
                description: None,
                name: crate::schema::default_positioned_name("Report"),
                directives: vec![],
                kind: TypeKind::Object(ObjectType {
                    implements: vec![],
                    fields: vec![
                        default_positioned(Schema::create_field("token", true, None, "String", vec![])),
                        default_positioned(Schema::create_field("name", true, None, "String", vec![])),
                        default_positioned(Schema::create_list_field(
                            "runs", true, None, "Run", vec![],
                        )),
                    ],
                }),
            }
        };

        let run_type = {
            use async_graphql_parser::types::{ObjectType, TypeDefinition, TypeKind};
            use crate::schema::default_positioned;

            TypeDefinition {
                extend: false,
                description: None,
                name: crate::schema::default_positioned_name("Run"),
                directives: vec![],
                kind: TypeKind::Object(ObjectType {
                    implements: vec![],
                    fields: vec![
                        default_positioned(Schema::create_field("token", true, None, "String", vec![])),
                        default_positioned(Schema::create_field("state", true, None, "String", vec![])),
                    ],
                }),
            }
        };

        Schema::new(
            vec![report_type, run_type],
            vec![Schema::create_field(
                "report",
                true,
                None,
                "Report",
                vec![Schema::create_arg("token", false, "String")],
            )],
        )
    }

    fn create_query_document(query_str: &str) -> ExecutableDocument {
        parse_query(query_str).unwrap()
    }

    fn validate(
        query: &str,
        operation_name: Option<&str>,
        variables: Option<&str>,
    ) -> Result<ValidatedOperation, ValidationError> {
        let schema = create_test_schema();
        let variables =
            variables.map(|variables| serde_json::from_str::<Map<String, Value>>(variables).unwrap());
        let validator = DocumentValidator::new(
            &schema,
            operation_name.map(|s| s.to_string()),
            variables,
            10,
        );
        validator.validate(create_query_document(query))
    }

    #[test]
    fn argument_valid() {
        let operation = validate(
            r#"
            query {
                report(token: "abc123") {
                    token
                    name
                    runs {
                        token
                        state
                    }
                }
            }
        "#,
            None,
            None,
        )
        .unwrap();

        assert_eq!(operation.fields.len(), 1);
        let report = &operation.fields[0];
        assert_eq!(report.name.as_str(), "report");
        assert_eq!(
            report.arguments.get("token"),
            Some(&ConstValue::String("abc123".to_string()))
        );
        assert_eq!(
            report
                .subfields
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>(),
            vec!["token", "name", "runs"]
        );
        assert_eq!(report.subfields[2].subfields.len(), 2);
    }

    #[test]
    fn aliases_valid() {
        let operation = validate(
            r#"
            query {
                first: report(token: "abc123") {
                    id: token
                }
            }
        "#,
            None,
            None,
        )
        .unwrap();

        assert_eq!(operation.fields[0].output_name(), "first");
        assert_eq!(operation.fields[0].subfields[0].output_name(), "id");
    }

    #[test]
    fn typename_valid() {
        let operation = validate(
            r#"
            query {
                report(token: "abc123") {
                    __typename
                    token
                }
            }
        "#,
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            operation.fields[0].subfields[0].name.as_str(),
            "__typename"
        );
    }

    #[test]
    fn invalid_subfield() {
        let result = validate(
            r#"
            query {
                report(token: "abc123") {
                    token
                    foobar
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(ValidationError::InvalidField(field, typ, _)) if field == "foobar" && typ == "Report"
        ));
    }

    #[test]
    fn scalar_with_subfields_invalid() {
        let result = validate(
            r#"
            query {
                report(token: "abc123") {
                    token {
                        nested
                    }
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(result, Err(ValidationError::ScalarWithField(..))));
    }

    #[test]
    fn stray_argument_invalid() {
        let result = validate(
            r#"
            query {
                report(token: "abc123", foo: "bar") { # foo is not a valid argument
                    token
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(ValidationError::StrayArguments(args, _, _)) if args == vec!["foo".to_string()]
        ));
    }

    #[test]
    fn unspecified_required_argument_invalid() {
        let result = validate(
            r#"
            query {
                report { # token argument is required here
                    token
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(ValidationError::RequiredArgumentNotFound(arg, _)) if arg == "token"
        ));
    }

    #[test]
    fn variable_resolution_valid() {
        let operation = validate(
            r#"
            query($report_token: String!) {
                report(token: $report_token) {
                    token
                }
            }
        "#,
            None,
            Some(r#"{ "report_token": "abc123" }"#),
        )
        .unwrap();

        assert_eq!(
            operation.fields[0].arguments.get("token"),
            Some(&ConstValue::String("abc123".to_string()))
        );
    }

    #[test]
    fn variable_resolution_invalid() {
        let result = validate(
            r#"
            query($report_token: String!) {
                report(token: $report_token) {
                    token
                }
            }
        "#,
            None,
            None, // no variables supplied
        );

        assert!(matches!(result, Err(ValidationError::VariableNotFound(..))));
    }

    #[test]
    fn fragment_spread_valid() {
        let operation = validate(
            r#"
            query {
                report(token: "abc123") {
                    ...reportInfo
                }
            }

            fragment reportInfo on Report {
                token
                name
            }
        "#,
            None,
            None,
        )
        .unwrap();

        assert_eq!(
            operation.fields[0]
                .subfields
                .iter()
                .map(|f| f.name.as_str())
                .collect::<Vec<_>>(),
            vec!["token", "name"]
        );
    }

    #[test]
    fn fragment_definition_not_found() {
        let result = validate(
            r#"
            query {
                report(token: "abc123") {
                    ...missingFragment
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(ValidationError::FragmentDefinitionNotFound(..))
        ));
    }

    #[test]
    fn multi_operations_valid() {
        let operation = validate(
            r#"
            query report1 {
                report(token: "t1") {
                    token
                }
            }

            query report2 {
                report(token: "t2") {
                    token
                }
            }
        "#,
            Some("report2"),
            None,
        )
        .unwrap();

        assert_eq!(
            operation.fields[0].arguments.get("token"),
            Some(&ConstValue::String("t2".to_string()))
        );
    }

    #[test]
    fn multi_operations_no_operation_name_invalid() {
        let result = validate(
            r#"
            query report1 {
                report(token: "t1") {
                    token
                }
            }

            query report2 {
                report(token: "t2") {
                    token
                }
            }
        "#,
            None,
            None,
        );

        assert!(matches!(
            result,
            Err(ValidationError::MultipleOperationsNoOperationName)
        ));
    }

    #[test]
    fn query_depth_limit() {
        let schema = create_test_schema();

        let query = r#"
            query {
                report(token: "abc123") {
                    runs {
                        token
                    }
                }
            }
        "#;

        // valid
        let validator = DocumentValidator::new(&schema, None, None, 3);
        assert!(validator.validate(create_query_document(query)).is_ok());

        // invalid: one level too deep
        let validator = DocumentValidator::new(&schema, None, None, 1);
        assert!(matches!(
            validator.validate(create_query_document(query)),
            Err(ValidationError::SelectionSetTooDeep(_))
        ));
    }
}
