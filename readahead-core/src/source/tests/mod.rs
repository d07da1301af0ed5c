mod attach_tests;
